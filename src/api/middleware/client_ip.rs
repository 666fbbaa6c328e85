//! Client address extractor.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::Extensions;
use axum::http::request::Parts;

use crate::state::AppState;

/// The resolved client address of a request, if any.
///
/// Resolved once from the socket peer and the forwarding headers according
/// to the deployment's [`crate::utils::client_ip::ClientIpPolicy`]. Never
/// rejects; an unknown address is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddress(pub Option<String>);

impl FromRequestParts<AppState> for ClientAddress {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let peer = peer_ip(&parts.extensions);

        Ok(Self(
            state
                .client_ip_policy
                .resolve(peer.as_deref(), &parts.headers),
        ))
    }
}

/// Socket peer address recorded by `into_make_service_with_connect_info`.
pub fn peer_ip(extensions: &Extensions) -> Option<String> {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}
