//! Business logic services for the application layer.

pub mod auth_service;
pub mod click_service;
pub mod link_service;
pub mod rate_limit_service;

pub use auth_service::AuthService;
pub use click_service::ClickService;
pub use link_service::LinkService;
pub use rate_limit_service::{
    DenialReason, Identity, RateLimitDecision, RateLimitPolicy, RateLimitService,
};
