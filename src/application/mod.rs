//! Application layer services implementing business logic.
//!
//! Services consume repository traits and give HTTP handlers a narrow API.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, slug allocation, listings
//! - [`services::rate_limit_service::RateLimitService`] - Hourly link creation limits
//! - [`services::auth_service::AuthService`] - Bearer token authentication
//! - [`services::click_service::ClickService`] - Click log access

pub mod services;
