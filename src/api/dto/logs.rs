//! DTOs for click log listings.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::Click;

#[derive(Debug, Serialize)]
pub struct ClickLogItem {
    pub id: i64,
    pub link_id: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub clicked_at: DateTime<Utc>,
}

impl From<Click> for ClickLogItem {
    fn from(click: Click) -> Self {
        Self {
            id: click.id,
            link_id: click.link_id,
            ip: click.ip,
            user_agent: click.user_agent,
            referer: click.referer,
            clicked_at: click.clicked_at,
        }
    }
}
