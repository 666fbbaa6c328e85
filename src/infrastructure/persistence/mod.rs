//! PostgreSQL repository implementations.
//!
//! - [`PgLinkRepository`] - Links and rate-limit window counts
//! - [`PgClickRepository`] - Click logs and link counters
//! - [`PgTokenRepository`] - API token storage and session lookup
//! - [`PgUserRepository`] - User provisioning

pub mod pg_click_repository;
pub mod pg_link_repository;
pub mod pg_token_repository;
pub mod pg_user_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_token_repository::PgTokenRepository;
pub use pg_user_repository::PgUserRepository;
