//! Redirect target cache.
//!
//! - [`RedisCache`] - Redis-backed cache
//! - [`NullCache`] - No-op fallback when Redis is absent

mod null_cache;
mod redis_cache;
mod service;

pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService, CachedLink};
