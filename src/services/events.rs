//! Events service.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::instrument;

use crate::auth::AuthProvider;
use crate::errors::{MailgunError, MailgunResult};
use crate::services::validate_domain;
use crate::transport::{HttpRequest, HttpTransport};
use crate::types::EventPage;

/// Largest page size the events endpoint accepts.
pub const MAX_EVENT_PAGE_LIMIT: u32 = 300;

/// Query filter for the events endpoint.
///
/// All criteria are optional; an empty filter fetches the most recent
/// page of events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    begin: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    ascending: Option<bool>,
    limit: Option<u32>,
    event: Option<String>,
    recipient: Option<String>,
    from: Option<String>,
    subject: Option<String>,
    tags: Option<String>,
    message_id: Option<String>,
    severity: Option<String>,
}

impl EventFilter {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start of the time range.
    pub fn begin(mut self, begin: DateTime<Utc>) -> Self {
        self.begin = Some(begin);
        self
    }

    /// End of the time range.
    pub fn end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    /// Traversal order.
    pub fn ascending(mut self, ascending: bool) -> Self {
        self.ascending = Some(ascending);
        self
    }

    /// Page size, 1 to 300.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Event type or expression, e.g. `failed` or `rejected OR failed`.
    pub fn event(mut self, event: impl Into<String>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Recipient address.
    pub fn recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    /// Sender address.
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Subject line.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Tag expression.
    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Message-Id header value.
    pub fn message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// Failure severity (`temporary` or `permanent`).
    pub fn severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    /// Checks the page size bounds.
    pub fn validate(&self) -> MailgunResult<()> {
        if let Some(limit) = self.limit {
            if limit == 0 || limit > MAX_EVENT_PAGE_LIMIT {
                return Err(MailgunError::invalid_argument(
                    "limit",
                    format!("must be between 1 and {}", MAX_EVENT_PAGE_LIMIT),
                ));
            }
        }
        Ok(())
    }

    /// Query parameters in a fixed order. Dates are RFC 2822.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(begin) = self.begin {
            pairs.push(("begin", begin.to_rfc2822()));
        }
        if let Some(end) = self.end {
            pairs.push(("end", end.to_rfc2822()));
        }
        if let Some(ascending) = self.ascending {
            pairs.push(("ascending", if ascending { "yes" } else { "no" }.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }

        let text_params = [
            ("event", &self.event),
            ("recipient", &self.recipient),
            ("from", &self.from),
            ("subject", &self.subject),
            ("tags", &self.tags),
            ("message-id", &self.message_id),
            ("severity", &self.severity),
        ];
        for (name, value) in text_params {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                pairs.push((name, value.to_string()));
            }
        }

        pairs
    }
}

/// Reads delivery events from the `/<domain>/events` endpoint.
#[derive(Clone)]
pub struct EventsService {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
}

impl EventsService {
    /// Creates a new events service.
    pub fn new(transport: Arc<dyn HttpTransport>, auth: Arc<dyn AuthProvider>) -> Self {
        Self { transport, auth }
    }

    /// Fetches one page of events.
    ///
    /// A non-2xx answer is [`MailgunError::UnexpectedStatus`]; a body that
    /// is not an event page is [`MailgunError::EventParse`]. An empty
    /// `items` array is a valid, empty page. Paging links are returned but
    /// not followed.
    #[instrument(skip(self, filter), fields(domain = %domain))]
    pub async fn fetch(
        &self,
        domain: &str,
        filter: Option<&EventFilter>,
    ) -> MailgunResult<EventPage> {
        validate_domain(domain)?;

        let mut path = format!("{}/events", domain);
        if let Some(filter) = filter {
            filter.validate()?;
            let pairs = filter.to_query_pairs();
            if !pairs.is_empty() {
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs)
                    .finish();
                path.push('?');
                path.push_str(&query);
            }
        }

        let mut request = HttpRequest::get(path).with_header("Accept", "application/json");
        self.auth.apply_auth(&mut request.headers);

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            tracing::warn!(status = response.status, "Events request failed");
            return Err(MailgunError::UnexpectedStatus {
                status: response.status,
                body: response.text(),
            });
        }

        let page: EventPage = response.json().map_err(|e| MailgunError::EventParse {
            message: e.to_string(),
            body: response.text(),
        })?;

        tracing::debug!(events = page.items.len(), "Fetched event page");

        Ok(page)
    }
}

impl std::fmt::Debug for EventsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventsService").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockAuth, MockResponse, MockTransport};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn service(transport: &Arc<MockTransport>) -> EventsService {
        EventsService::new(transport.clone(), Arc::new(MockAuth::default()))
    }

    #[test]
    fn test_filter_query_pairs_order() {
        let filter = EventFilter::new()
            .severity("permanent")
            .event("failed")
            .limit(25)
            .ascending(true)
            .begin(Utc.with_ymd_and_hms(2024, 1, 12, 3, 4, 5).unwrap())
            .message_id("abc@mg.example.com");

        assert_eq!(
            filter.to_query_pairs(),
            vec![
                ("begin", "Fri, 12 Jan 2024 03:04:05 +0000".to_string()),
                ("ascending", "yes".to_string()),
                ("limit", "25".to_string()),
                ("event", "failed".to_string()),
                ("message-id", "abc@mg.example.com".to_string()),
                ("severity", "permanent".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_limit_bounds() {
        assert!(EventFilter::new().limit(1).validate().is_ok());
        assert!(EventFilter::new().limit(300).validate().is_ok());
        assert!(matches!(
            EventFilter::new().limit(0).validate(),
            Err(MailgunError::InvalidArgument { .. })
        ));
        assert!(EventFilter::new().limit(301).validate().is_err());
    }

    #[tokio::test]
    async fn test_fetch_without_filter() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&serde_json::json!({
            "items": [{"event": "delivered", "recipient": "alice@example.com"}],
            "paging": {"next": "https://api.mailgun.net/v3/mg.example.com/events/next"}
        }));

        let page = service(&transport)
            .fetch("mg.example.com", None)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].event.as_deref(), Some("delivered"));

        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "mg.example.com/events");
        assert_eq!(
            request.headers.get("Authorization").map(String::as_str),
            Some("Basic mock-api-key")
        );
    }

    #[tokio::test]
    async fn test_fetch_encodes_filter() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&serde_json::json!({"items": []}));

        let filter = EventFilter::new()
            .event("rejected OR failed")
            .recipient("alice@example.com");
        let page = service(&transport)
            .fetch("mg.example.com", Some(&filter))
            .await
            .unwrap();

        assert!(page.is_empty());
        assert_eq!(
            transport.last_request().unwrap().path,
            "mg.example.com/events?event=rejected+OR+failed&recipient=alice%40example.com"
        );
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_parse_error() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::text(200, "<html>maintenance</html>"));

        let result = service(&transport).fetch("mg.example.com", None).await;

        match result {
            Err(MailgunError::EventParse { body, .. }) => {
                assert_eq!(body, "<html>maintenance</html>");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::text(401, "Forbidden"));

        let result = service(&transport).fetch("mg.example.com", None).await;

        assert!(matches!(
            result,
            Err(MailgunError::UnexpectedStatus { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_rejects_bad_limit_before_network() {
        let transport = Arc::new(MockTransport::new());
        let filter = EventFilter::new().limit(1000);

        let result = service(&transport)
            .fetch("mg.example.com", Some(&filter))
            .await;

        assert!(result.is_err());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_fetch_rejects_domain_with_query() {
        let transport = Arc::new(MockTransport::new());

        let result = service(&transport)
            .fetch("mg.example.com/messages#", None)
            .await;

        assert!(matches!(result, Err(MailgunError::InvalidArgument { .. })));
        assert_eq!(transport.request_count(), 0);
    }
}
