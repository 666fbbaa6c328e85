//! DTOs for link creation and the user's link listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::link_service::short_url;
use crate::domain::entities::Link;

/// Request to shorten one URL.
///
/// Destination safety is checked by the link service, not here; this only
/// bounds the payload size.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub url: String,

    #[serde(default, alias = "customSlug")]
    #[validate(length(max = 50, message = "Slug must be at most 50 characters"))]
    pub custom_slug: Option<String>,
}

/// A link as returned to its creator.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: i64,
    pub slug: String,
    pub original_url: String,
    pub short_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: Link, base_url: &str) -> Self {
        Self {
            short_url: short_url(base_url, &link.slug),
            id: link.id,
            slug: link.slug,
            original_url: link.original_url,
            clicks: link.clicks,
            created_at: link.created_at,
        }
    }
}
