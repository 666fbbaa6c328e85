//! Handlers for link creation and the user's link listing.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use tracing::{info, warn};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, LinkResponse};
use crate::api::dto::pagination::{LimitPage, LimitParams};
use crate::api::middleware::{AuthUser, ClientAddress, MaybeUser};
use crate::application::services::{Identity, RateLimitDecision};
use crate::domain::entities::Creator;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// ```json
/// { "url": "https://example.com/page", "custom_slug": "promo" }
/// ```
///
/// The session is optional unless anonymous creation is disabled. Checks run
/// in a fixed order: hourly rate limit for the caller's identity, payload
/// validation, destination safety, then slug allocation.
///
/// # Errors
///
/// - 401 when anonymous creation is disabled and no session is present
/// - 429 when the caller created too many links in the last hour
/// - 400 `unsafe_url` when the destination is not allowed
/// - 400 `validation_error` for a malformed body or custom slug
/// - 409 when the custom slug is taken
pub async fn create_link_handler(
    State(state): State<AppState>,
    ClientAddress(address): ClientAddress,
    MaybeUser(session): MaybeUser,
    payload: Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LinkResponse>), AppError> {
    let identity = Identity {
        address: address.clone(),
        user_id: session.as_ref().map(|s| s.user_id),
    };

    if let RateLimitDecision::Denied(reason) = state.rate_limit_service.check(&identity).await? {
        metrics::counter!("link_creation_rejected_total", "reason" => reason.label())
            .increment(1);
        warn!(
            client_ip = address.as_deref(),
            user_id = identity.user_id,
            reason = reason.label(),
            "Link creation refused"
        );
        return Err(reason.into());
    }

    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    })?;
    payload.validate()?;

    let creator = match session {
        Some(user) => Creator::User(user.user_id),
        None => Creator::Anonymous {
            ip: address.clone(),
        },
    };

    let link = match state
        .link_service
        .create_link(&payload.url, payload.custom_slug.as_deref(), creator)
        .await
    {
        Ok(link) => link,
        Err(e @ AppError::UnsafeUrl { .. }) => {
            metrics::counter!("link_creation_rejected_total", "reason" => "unsafe_url")
                .increment(1);
            warn!(
                client_ip = address.as_deref(),
                user_id = identity.user_id,
                details = %e.to_error_info().details,
                "Rejected unsafe destination URL"
            );
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    metrics::counter!("links_created_total").increment(1);
    info!(
        link_id = link.id,
        slug = %link.slug,
        user_id = link.user_id,
        "Link created"
    );

    Ok((
        StatusCode::CREATED,
        Json(LinkResponse::new(link, &state.base_url)),
    ))
}

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links?page=1&limit=10`
///
/// `limit` defaults to 10 and is clamped to 1-100.
pub async fn list_links_handler(
    State(state): State<AppState>,
    AuthUser(session): AuthUser,
    Query(params): Query<LimitParams>,
) -> Result<Json<LimitPage<LinkResponse>>, AppError> {
    let (page, limit) = params.resolve();

    let (links, total) = state
        .link_service
        .list_for_user(session.user_id, page, limit)
        .await?;

    let data = links
        .into_iter()
        .map(|link| LinkResponse::new(link, &state.base_url))
        .collect();

    Ok(Json(LimitPage::new(data, total, page, limit)))
}
