//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL with its creator attribution.
///
/// A link is attributed either to an authenticated user (`user_id`) or to the
/// client address of an anonymous request (`creator_ip`), never both.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: i64,
    pub slug: String,
    pub original_url: String,
    pub user_id: Option<i64>,
    pub creator_ip: Option<String>,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Returns true if the link was created without a session.
    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }

    /// Returns true if `user_id` created this link.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == Some(user_id)
    }
}

/// Who is creating a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Creator {
    /// An authenticated user. The client address is not stored.
    User(i64),
    /// An anonymous request, attributed to its resolved client address if any.
    Anonymous { ip: Option<String> },
}

impl Creator {
    pub fn user_id(&self) -> Option<i64> {
        match self {
            Creator::User(id) => Some(*id),
            Creator::Anonymous { .. } => None,
        }
    }

    pub fn creator_ip(&self) -> Option<&str> {
        match self {
            Creator::User(_) => None,
            Creator::Anonymous { ip } => ip.as_deref(),
        }
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub slug: String,
    pub original_url: String,
    pub creator: Creator,
}

/// A link joined with its creator's profile, as listed in the admin view.
#[derive(Debug, Clone)]
pub struct LinkWithCreator {
    pub link: Link,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(user_id: Option<i64>, creator_ip: Option<&str>) -> Link {
        Link {
            id: 1,
            slug: "abcdef".to_string(),
            original_url: "https://example.com".to_string(),
            user_id,
            creator_ip: creator_ip.map(str::to_string),
            clicks: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_anonymous_link() {
        let link = link(None, Some("5.5.5.5"));
        assert!(link.is_anonymous());
        assert!(!link.is_owned_by(1));
    }

    #[test]
    fn test_owned_link() {
        let link = link(Some(7), None);
        assert!(!link.is_anonymous());
        assert!(link.is_owned_by(7));
        assert!(!link.is_owned_by(8));
    }

    #[test]
    fn test_creator_attribution_is_exclusive() {
        let user = Creator::User(3);
        assert_eq!(user.user_id(), Some(3));
        assert_eq!(user.creator_ip(), None);

        let anon = Creator::Anonymous {
            ip: Some("5.5.5.5".to_string()),
        };
        assert_eq!(anon.user_id(), None);
        assert_eq!(anon.creator_ip(), Some("5.5.5.5"));
    }
}
