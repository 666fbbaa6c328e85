//! Infrastructure layer for external integrations.
//!
//! Implements the domain repository traits on PostgreSQL and provides the
//! redirect cache.
//!
//! # Modules
//!
//! - [`cache`] - Redis and no-op cache implementations
//! - [`persistence`] - PostgreSQL repository implementations

pub mod cache;
pub mod persistence;
