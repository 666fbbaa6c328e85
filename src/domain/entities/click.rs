//! Click log entity representing a single redirect event.

use chrono::{DateTime, Utc};

/// A redirect recorded against a link.
///
/// Client metadata is optional; headers may be missing and the client
/// address may be unknown.
#[derive(Debug, Clone)]
pub struct Click {
    pub id: i64,
    pub link_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub ip: Option<String>,
}

/// Input data for recording a new click.
///
/// The timestamp is set by the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClick {
    pub link_id: i64,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub ip: Option<String>,
}
