//! DTOs for the admin link listing.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::application::services::link_service::short_url;
use crate::domain::entities::LinkWithCreator;

/// A link with its creator, as seen by an admin.
///
/// Anonymous links carry `creator_ip` and no user fields.
#[derive(Debug, Serialize)]
pub struct AdminLinkItem {
    pub id: i64,
    pub slug: String,
    pub original_url: String,
    pub short_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub user_id: Option<i64>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub creator_ip: Option<String>,
}

impl AdminLinkItem {
    pub fn new(item: LinkWithCreator, base_url: &str) -> Self {
        let LinkWithCreator {
            link,
            user_name,
            user_email,
        } = item;

        Self {
            short_url: short_url(base_url, &link.slug),
            id: link.id,
            slug: link.slug,
            original_url: link.original_url,
            clicks: link.clicks,
            created_at: link.created_at,
            user_id: link.user_id,
            user_name,
            user_email,
            creator_ip: link.creator_ip,
        }
    }
}
