//! Click event model for asynchronous click logging.

use crate::domain::entities::NewClick;

/// Longest header value kept in a click log.
const MAX_HEADER_LEN: usize = 512;

/// A redirect observed by the HTTP layer, queued for the click worker.
///
/// Sent over a bounded channel so the redirect response never waits for the
/// database write. The address is the same resolved client address used for
/// rate limiting.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub link_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl ClickEvent {
    /// Creates a click event, truncating oversized header values.
    pub fn new(
        link_id: i64,
        ip: Option<String>,
        user_agent: Option<&str>,
        referer: Option<&str>,
    ) -> Self {
        Self {
            link_id,
            ip,
            user_agent: user_agent.map(truncate),
            referer: referer.map(truncate),
        }
    }
}

impl From<ClickEvent> for NewClick {
    fn from(event: ClickEvent) -> Self {
        NewClick {
            link_id: event.link_id,
            user_agent: event.user_agent,
            referer: event.referer,
            ip: event.ip,
        }
    }
}

fn truncate(value: &str) -> String {
    match value.char_indices().nth(MAX_HEADER_LEN) {
        Some((idx, _)) => value[..idx].to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_event_creation_full() {
        let event = ClickEvent::new(
            42,
            Some("203.0.113.5".to_string()),
            Some("Mozilla/5.0"),
            Some("https://google.com"),
        );

        assert_eq!(event.link_id, 42);
        assert_eq!(event.ip.as_deref(), Some("203.0.113.5"));
        assert_eq!(event.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(event.referer.as_deref(), Some("https://google.com"));
    }

    #[test]
    fn test_click_event_creation_minimal() {
        let event = ClickEvent::new(1, None, None, None);

        assert!(event.ip.is_none());
        assert!(event.user_agent.is_none());
        assert!(event.referer.is_none());
    }

    #[test]
    fn test_long_headers_are_truncated() {
        let agent = "a".repeat(2_000);
        let event = ClickEvent::new(1, None, Some(&agent), None);

        assert_eq!(event.user_agent.unwrap().len(), MAX_HEADER_LEN);
    }

    #[test]
    fn test_into_new_click() {
        let event = ClickEvent::new(9, Some("1.1.1.1".to_string()), Some("Safari"), None);
        let click: NewClick = event.into();

        assert_eq!(click.link_id, 9);
        assert_eq!(click.ip.as_deref(), Some("1.1.1.1"));
        assert_eq!(click.user_agent.as_deref(), Some("Safari"));
        assert!(click.referer.is_none());
    }
}
