//! Integration tests for message submission

use super::*;
use integrations_mailgun::{FileAttachment, MailgunError, MessageBuilder, Recipient};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{any, body_string_contains, header, header_regex, method, path};
use wiremock::{Mock, ResponseTemplate};

fn base_builder() -> MessageBuilder {
    let mut builder = MessageBuilder::new();
    builder
        .set_from_address(Recipient::new("a@b.com"))
        .unwrap()
        .add_to_recipient(Recipient::with_name("c@d.com", "C"), None)
        .unwrap()
        .set_subject("Quarterly report")
        .unwrap()
        .set_text_body("See attached.")
        .unwrap();
    builder
}

#[tokio::test]
async fn test_send_message_with_attachment() {
    let mock_server = setup_mock_server().await;

    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("report.txt");
    std::fs::write(&report, "revenue,42\n").unwrap();

    Mock::given(method("POST"))
        .and(path(format!("/{}/messages", TEST_DOMAIN)))
        .and(header("Authorization", TEST_AUTH_HEADER))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"attachment\"; filename=\"report.txt\""))
        .and(body_string_contains("revenue,42"))
        .and(body_string_contains("\"C\" <c@d.com>,"))
        .and(body_string_contains("name=\"o:dkim\""))
        .and(body_string_contains("name=\"h:X-Campaign-Source\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "<20240102030405.1.ABC@mg.example.com>",
            "message": "Queued. Thank you."
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut builder = base_builder();
    builder
        .add_attachment(&report)
        .unwrap()
        .add_custom_header("X-Campaign-Source", "reports")
        .unwrap();

    let client = client_for(&mock_server);
    let response = client
        .messages()
        .send(TEST_DOMAIN, builder.message())
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["message"], "Queued. Thank you.");
}

#[tokio::test]
async fn test_send_text_only_message_is_multipart() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(format!("/{}/messages", TEST_DOMAIN)))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"o:tag\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Queued"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut builder = base_builder();
    builder.add_tag("reports").unwrap();

    let response = client_for(&mock_server)
        .messages()
        .send(TEST_DOMAIN, builder.message())
        .await
        .unwrap();

    assert!(response.is_success());
}

#[tokio::test]
async fn test_send_in_memory_and_inline_parts() {
    let mock_server = setup_mock_server().await;

    let dir = tempfile::tempdir().unwrap();
    let logo = dir.path().join("logo.png");
    std::fs::write(&logo, b"PNGX").unwrap();

    Mock::given(method("POST"))
        .and(path(format!("/{}/messages", TEST_DOMAIN)))
        .and(body_string_contains("name=\"attachment\"; filename=\"notes.txt\""))
        .and(body_string_contains("name=\"inline\"; filename=\"logo.png\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Queued"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut builder = base_builder();
    builder
        .set_html_body("<img src=\"cid:logo.png\">")
        .unwrap()
        .add_inline_image(&logo)
        .unwrap()
        .add_file_attachment(FileAttachment::new("notes.txt", b"remember".to_vec()).unwrap());

    let response = client_for(&mock_server)
        .messages()
        .send(TEST_DOMAIN, builder.message())
        .await
        .unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_send_passes_through_error_status() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path(format!("/{}/messages", TEST_DOMAIN)))
        .respond_with(ResponseTemplate::new(401).set_body_string("Forbidden"))
        .mount(&mock_server)
        .await;

    let response = client_for(&mock_server)
        .messages()
        .send(TEST_DOMAIN, base_builder().message())
        .await
        .unwrap();

    assert_eq!(response.status, 401);
    assert!(!response.is_success());
    assert_eq!(response.text(), "Forbidden");
}

#[tokio::test]
async fn test_missing_attachment_sends_nothing() {
    let mock_server = setup_mock_server().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut builder = base_builder();
    builder
        .add_attachment(dir.path().join("does-not-exist.pdf"))
        .unwrap();

    let result = client_for(&mock_server)
        .messages()
        .send(TEST_DOMAIN, builder.message())
        .await;

    assert!(matches!(result, Err(MailgunError::Attachment { .. })));
}

#[tokio::test]
async fn test_missing_from_sends_nothing() {
    let mock_server = setup_mock_server().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut builder = MessageBuilder::new();
    builder
        .add_to_recipient(Recipient::new("c@d.com"), None)
        .unwrap();

    let result = client_for(&mock_server)
        .messages()
        .send(TEST_DOMAIN, builder.message())
        .await;

    assert!(matches!(
        result,
        Err(MailgunError::RequiredFieldMissing { .. })
    ));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = MailgunClient::builder()
        .api_key(TEST_API_KEY)
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap();

    let result = client
        .messages()
        .send(TEST_DOMAIN, base_builder().message())
        .await;

    assert!(matches!(result, Err(MailgunError::Transport { .. })));
}
