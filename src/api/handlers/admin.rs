//! Handler for the admin link listing.

use axum::{
    Json,
    extract::{Query, State},
};

use crate::api::dto::admin::AdminLinkItem;
use crate::api::dto::pagination::{PageSizeParams, SizedPage};
use crate::api::middleware::AdminUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists all links with their creators, newest first.
///
/// # Endpoint
///
/// `GET /api/admin/links?page=1&page_size=50`
///
/// `page_size` (alias `pageSize`) defaults to 50 and is clamped to 1-100.
/// Responds 403 unless the session belongs to an admin.
pub async fn admin_links_handler(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(params): Query<PageSizeParams>,
) -> Result<Json<SizedPage<AdminLinkItem>>, AppError> {
    let (page, page_size) = params.resolve();

    let (links, total) = state.link_service.list_all(page, page_size).await?;

    let data = links
        .into_iter()
        .map(|item| AdminLinkItem::new(item, &state.base_url))
        .collect();

    Ok(Json(SizedPage::new(data, total, page, page_size)))
}
