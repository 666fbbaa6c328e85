//! Repository trait for short link data access.

use crate::domain::entities::{Link, LinkWithCreator, NewLink};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for short links.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>, AppError>;

    /// Finds a link by its id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError>;

    /// Lists a user's links, newest first.
    async fn list_by_user(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Link>, AppError>;

    /// Counts all links owned by a user.
    async fn count_by_user(&self, user_id: i64) -> Result<i64, AppError>;

    /// Lists every link with its creator's profile, newest first.
    async fn list_with_creator(
        &self,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<LinkWithCreator>, AppError>;

    /// Counts all links.
    async fn count_all(&self) -> Result<i64, AppError>;

    /// Counts links created by `user_id` at or after `since`.
    async fn count_by_user_since(
        &self,
        user_id: i64,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError>;

    /// Counts anonymous links attributed to `ip` created at or after `since`.
    async fn count_anonymous_by_ip_since(
        &self,
        ip: &str,
        since: DateTime<Utc>,
    ) -> Result<i64, AppError>;
}
