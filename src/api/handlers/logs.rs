//! Handler for click logs of a link.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::dto::logs::ClickLogItem;
use crate::api::dto::pagination::{PageSizeParams, SizedPage};
use crate::api::middleware::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists redirects recorded for a link, newest first.
///
/// # Endpoint
///
/// `GET /api/logs/{link_id}?page=1&page_size=50`
///
/// # Errors
///
/// Returns 404 when the link does not exist or belongs to another user
/// (admins can read any link).
pub async fn link_logs_handler(
    State(state): State<AppState>,
    AuthUser(session): AuthUser,
    Path(link_id): Path<i64>,
    Query(params): Query<PageSizeParams>,
) -> Result<Json<SizedPage<ClickLogItem>>, AppError> {
    let (page, page_size) = params.resolve();

    let (clicks, total) = state
        .click_service
        .list_for_link(&session, link_id, page, page_size)
        .await?;

    let data = clicks.into_iter().map(ClickLogItem::from).collect();

    Ok(Json(SizedPage::new(data, total, page, page_size)))
}
