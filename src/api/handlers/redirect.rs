//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, header},
    response::Redirect,
};
use serde_json::json;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, warn};

use crate::api::middleware::ClientAddress;
use crate::domain::click_event::ClickEvent;
use crate::error::AppError;
use crate::infrastructure::cache::CachedLink;
use crate::state::AppState;
use crate::utils::slug::is_valid_slug;

/// Redirects a slug to its destination.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// # Request Flow
///
/// 1. Look up the slug in the cache
/// 2. On a miss, load it from the database and fill the cache in the background
/// 3. Queue a click event with the resolved client address
/// 4. Return 307 Temporary Redirect
///
/// Cache errors fall back to the database. Click events are dropped when the
/// queue is full; the redirect never waits for the click write.
///
/// # Errors
///
/// Returns 404 Not Found if the slug doesn't exist.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    ClientAddress(address): ClientAddress,
    headers: HeaderMap,
) -> Result<Redirect, AppError> {
    if !is_valid_slug(&slug) {
        return Err(AppError::not_found(
            "Short link not found",
            json!({ "slug": slug }),
        ));
    }

    let target = match state.cache.get_link(&slug).await {
        Ok(Some(cached)) => cached,
        Ok(None) => load_and_cache(&state, &slug).await?,
        Err(e) => {
            error!(error = %e, "Cache error, falling back to database");
            let link = state.link_service.get_by_slug(&slug).await?;
            CachedLink {
                link_id: link.id,
                original_url: link.original_url,
            }
        }
    };

    let event = ClickEvent::new(
        target.link_id,
        address,
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    );

    match state.click_sender.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            metrics::counter!("clicks_dropped_total").increment(1);
            debug!(link_id = target.link_id, "Click queue full, dropping click");
        }
        Err(TrySendError::Closed(_)) => {
            metrics::counter!("clicks_dropped_total").increment(1);
            warn!("Click queue closed, dropping click");
        }
    }

    Ok(Redirect::temporary(&target.original_url))
}

async fn load_and_cache(state: &AppState, slug: &str) -> Result<CachedLink, AppError> {
    let link = state.link_service.get_by_slug(slug).await?;
    let target = CachedLink {
        link_id: link.id,
        original_url: link.original_url,
    };

    let cache = state.cache.clone();
    let ttl = state.cache_ttl_seconds;
    let key = slug.to_string();
    let value = target.clone();
    tokio::spawn(async move {
        if let Err(e) = cache.set_link(&key, &value, Some(ttl)).await {
            error!(error = %e, "Failed to cache redirect target");
        }
    });

    Ok(target)
}
