//! Per-address request burst limiting using a token bucket.
//!
//! This is an outer shield against request floods. The hourly link creation
//! limits live in [`crate::application::services::RateLimitService`].

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorError, GovernorLayer, governor::GovernorConfigBuilder, key_extractor::KeyExtractor,
};

use crate::api::middleware::client_ip::peer_ip;
use crate::utils::client_ip::ClientIpPolicy;

/// Keys buckets by the same client address the handlers see.
///
/// Requests without any resolvable address share one bucket.
#[derive(Debug, Clone, Copy)]
pub struct ClientKeyExtractor {
    policy: ClientIpPolicy,
}

impl ClientKeyExtractor {
    pub fn new(policy: ClientIpPolicy) -> Self {
        Self { policy }
    }
}

impl KeyExtractor for ClientKeyExtractor {
    type Key = String;

    fn extract<T>(&self, req: &axum::http::Request<T>) -> Result<Self::Key, GovernorError> {
        let peer = peer_ip(req.extensions());

        Ok(self
            .policy
            .resolve(peer.as_deref(), req.headers())
            .unwrap_or_else(|| "unknown".to_string()))
    }
}

pub type ClientGovernorLayer =
    GovernorLayer<ClientKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Limiter for the whole API: bursts of 100, refilled by one request every 2 seconds.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn layer(policy: ClientIpPolicy) -> ClientGovernorLayer {
    build(policy, 2, 100)
}

/// Stricter limiter for admin endpoints: bursts of 20, refilled by one request per second.
pub fn secure_layer(policy: ClientIpPolicy) -> ClientGovernorLayer {
    build(policy, 1, 20)
}

fn build(policy: ClientIpPolicy, replenish_secs: u64, burst: u32) -> ClientGovernorLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(replenish_secs)
            .burst_size(burst)
            .key_extractor(ClientKeyExtractor::new(policy))
            .finish()
            .expect("non-zero governor period and burst"),
    );

    GovernorLayer::new(governor_conf)
}
