//! Service implementations for the Mailgun API.

mod events;
mod messages;
mod notifications;

pub use events::{EventFilter, EventsService, MAX_EVENT_PAGE_LIMIT};
pub use messages::MessageService;
pub use notifications::{Notification, NotificationOptions, NotificationService};

use crate::errors::{MailgunError, MailgunResult};

/// Checks that a sending domain is a single path segment.
fn validate_domain(domain: &str) -> MailgunResult<()> {
    if domain.is_empty() {
        return Err(MailgunError::argument_missing("domain"));
    }
    if domain
        .chars()
        .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
    {
        return Err(MailgunError::invalid_argument(
            "domain",
            format!("'{}' is not a valid sending domain", domain),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_validate_domain_accepts_plain_domain() {
        assert!(validate_domain("mg.example.com").is_ok());
        assert!(validate_domain("sandbox123.mailgun.org").is_ok());
    }

    #[test]
    fn test_validate_domain_empty() {
        assert!(matches!(
            validate_domain(""),
            Err(MailgunError::ArgumentMissing { .. })
        ));
    }

    #[test_case("mg.example.com/../other" ; "slash")]
    #[test_case("mg.example.com?x=1" ; "query")]
    #[test_case("mg.example.com#frag" ; "fragment")]
    #[test_case("mg.example.com%2Fevents" ; "percent")]
    #[test_case("mg example.com" ; "space")]
    fn test_validate_domain_rejects_path_characters(domain: &str) {
        assert!(matches!(
            validate_domain(domain),
            Err(MailgunError::InvalidArgument { .. })
        ));
    }
}
