//! Request extractors and middleware layers.
//!
//! Authentication and client addressing are extractors; burst limiting and
//! tracing are tower layers.

pub mod auth;
pub mod client_ip;
pub mod rate_limit;
pub mod tracing;

pub use auth::{AdminUser, AuthUser, MaybeUser};
pub use client_ip::ClientAddress;
