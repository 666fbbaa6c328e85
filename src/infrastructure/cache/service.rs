//! Cache service trait and error types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    #[error("Cache operation error: {0}")]
    OperationError(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// What the redirect handler needs to answer without a database round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedLink {
    pub link_id: i64,
    pub original_url: String,
}

/// Redirect target cache keyed by slug.
///
/// Implementations are fail-open: backend errors are logged and reported as
/// a miss (for reads) or success (for writes), so a cache outage degrades to
/// database lookups instead of failing redirects.
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached target for `slug`, or `None` on a miss.
    async fn get_link(&self, slug: &str) -> CacheResult<Option<CachedLink>>;

    /// Stores the target for `slug`, using the default TTL when `ttl_seconds`
    /// is `None`.
    async fn set_link(
        &self,
        slug: &str,
        link: &CachedLink,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    async fn invalidate(&self, slug: &str) -> CacheResult<()>;

    /// Reported by the health endpoint.
    async fn health_check(&self) -> bool;
}
