//! API route configuration.
//!
//! Authentication is per-handler through the extractors in
//! [`crate::api::middleware::auth`]; link creation accepts anonymous callers.

use crate::api::handlers::{
    admin_links_handler, create_link_handler, link_logs_handler, list_links_handler,
};
use crate::api::middleware::rate_limit;
use crate::state::AppState;
use crate::utils::client_ip::ClientIpPolicy;
use axum::{Router, routing::get};

/// Routes nested under `/api`.
///
/// # Endpoints
///
/// - `POST /links`            - Create a short link (session optional)
/// - `GET  /links`            - List the caller's links (session required)
/// - `GET  /admin/links`      - List all links with creators (admin only)
/// - `GET  /logs/{link_id}`   - Click logs for a link (owner or admin)
pub fn api_routes(policy: ClientIpPolicy) -> Router<AppState> {
    let admin = Router::new()
        .route("/admin/links", get(admin_links_handler))
        .layer(rate_limit::secure_layer(policy));

    Router::new()
        .route(
            "/links",
            get(list_links_handler).post(create_link_handler),
        )
        .route("/logs/{link_id}", get(link_logs_handler))
        .merge(admin)
}
