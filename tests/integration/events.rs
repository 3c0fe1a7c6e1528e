//! Integration tests for event retrieval

use super::*;
use integrations_mailgun::{EventFilter, MailgunError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn events_path() -> String {
    format!("/{}/events", TEST_DOMAIN)
}

#[tokio::test]
async fn test_fetch_events_with_filter() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path(events_path()))
        .and(header("Authorization", TEST_AUTH_HEADER))
        .and(query_param("event", "failed"))
        .and(query_param("limit", "10"))
        .and(query_param("ascending", "no"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "W3siYiI6",
                "event": "failed",
                "severity": "permanent",
                "recipient": "bounce@example.com",
                "timestamp": 1704164645.123,
                "delivery-status": {"code": 550, "message": "No such user"}
            }],
            "paging": {
                "next": format!("{}/{}/events/page2", mock_server.uri(), TEST_DOMAIN)
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let filter = EventFilter::new()
        .event("failed")
        .limit(10)
        .ascending(false);

    let page = client_for(&mock_server)
        .events()
        .fetch(TEST_DOMAIN, Some(&filter))
        .await
        .unwrap();

    assert_eq!(page.items.len(), 1);
    let event = &page.items[0];
    assert_eq!(event.severity.as_deref(), Some("permanent"));
    assert_eq!(
        event.delivery_status.as_ref().and_then(|s| s.code),
        Some(550)
    );
    assert!(page.next_page_url().unwrap().ends_with("/events/page2"));
}

#[tokio::test]
async fn test_fetch_empty_page() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path(events_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [],
            "paging": {}
        })))
        .mount(&mock_server)
        .await;

    let page = client_for(&mock_server)
        .events()
        .fetch(TEST_DOMAIN, None)
        .await
        .unwrap();

    assert!(page.is_empty());
}

#[tokio::test]
async fn test_fetch_malformed_json_is_parse_error() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path(events_path()))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"items\": [oops"))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server)
        .events()
        .fetch(TEST_DOMAIN, None)
        .await;

    match result {
        Err(MailgunError::EventParse { body, .. }) => assert_eq!(body, "{\"items\": [oops"),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_server_error_status() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path(events_path()))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&mock_server)
        .await;

    let result = client_for(&mock_server)
        .events()
        .fetch(TEST_DOMAIN, None)
        .await;

    match result {
        Err(MailgunError::UnexpectedStatus { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "unavailable");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}
