//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{slug}`  - Short link redirect (public)
//! - `GET  /health`  - Health check: DB, cache, click queue (public)
//! - `/api/*`        - REST API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Burst limiting** - Per-address token bucket keyed by the resolved client address
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with all routes and middleware, without path
/// normalization.
///
/// Client address resolution for both the burst limiter and the handlers uses
/// `state.client_ip_policy`, so they always key on the same address.
pub fn router(state: AppState) -> Router {
    let policy = state.client_ip_policy;

    Router::new()
        .route("/{slug}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api::routes::api_routes(policy))
        .layer(rate_limit::layer(policy))
        .with_state(state)
        .layer(tracing::layer())
}

/// The served application: [`router`] with trailing slashes trimmed.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
