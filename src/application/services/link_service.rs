//! Link creation and retrieval service.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::entities::{Creator, Link, LinkWithCreator, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::slug::{DEFAULT_SLUG_LENGTH, MAX_SLUG_LENGTH, generate_slug, is_valid_slug};
use crate::utils::url_safety::check_url;

/// Attempts at inserting a generated slug before giving up.
const MAX_SLUG_ATTEMPTS: usize = 10;

/// Slugs that would shadow routed paths.
const RESERVED_SLUGS: &[&str] = &["api", "health"];

fn is_reserved(slug: &str) -> bool {
    RESERVED_SLUGS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(slug))
}

/// Draws from `generate` until the slug is not a routed path.
fn fresh_slug(mut generate: impl FnMut() -> String) -> String {
    loop {
        let slug = generate();
        if !is_reserved(&slug) {
            return slug;
        }
    }
}

/// Service for creating and listing shortened links.
///
/// Destination URLs are checked against the SSRF policy before any slug is
/// minted. Uniqueness of slugs is left to the store: generated slugs are
/// regenerated on a unique violation, custom slugs fail with a conflict.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    slug_length: usize,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    pub fn new(link_repository: Arc<L>) -> Self {
        Self::with_slug_length(link_repository, DEFAULT_SLUG_LENGTH)
    }

    pub fn with_slug_length(link_repository: Arc<L>, slug_length: usize) -> Self {
        Self {
            link_repository,
            slug_length: slug_length.clamp(1, MAX_SLUG_LENGTH),
        }
    }

    /// Creates a short link for `original_url`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnsafeUrl`] if the destination fails the safety
    /// policy, [`AppError::Validation`] if the custom slug is malformed or
    /// reserved, and [`AppError::Conflict`] if the custom slug is taken.
    ///
    /// Returns [`AppError::Internal`] if no free generated slug was found or
    /// on database errors.
    pub async fn create_link(
        &self,
        original_url: &str,
        custom_slug: Option<&str>,
        creator: Creator,
    ) -> Result<Link, AppError> {
        let original_url = original_url.trim();

        if let Err(reason) = check_url(original_url) {
            return Err(AppError::unsafe_url(
                "URL is not allowed",
                json!({ "reason": reason.label(), "detail": reason.to_string() }),
            ));
        }

        match custom_slug.map(str::trim).filter(|s| !s.is_empty()) {
            Some(slug) => self.create_with_custom_slug(original_url, slug, creator).await,
            None => self.create_with_generated_slug(original_url, creator).await,
        }
    }

    async fn create_with_custom_slug(
        &self,
        original_url: &str,
        slug: &str,
        creator: Creator,
    ) -> Result<Link, AppError> {
        validate_custom_slug(slug)?;

        let new_link = NewLink {
            slug: slug.to_string(),
            original_url: original_url.to_string(),
            creator,
        };

        self.link_repository
            .create(new_link)
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } => AppError::conflict(
                    "Custom slug is already taken",
                    json!({ "slug": slug }),
                ),
                other => other,
            })
    }

    async fn create_with_generated_slug(
        &self,
        original_url: &str,
        creator: Creator,
    ) -> Result<Link, AppError> {
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let new_link = NewLink {
                slug: fresh_slug(|| generate_slug(self.slug_length)),
                original_url: original_url.to_string(),
                creator: creator.clone(),
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => return Ok(link),
                Err(AppError::Conflict { .. }) => {
                    debug!(attempt, "Generated slug collided, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique slug",
            json!({ "reason": "Too many collisions", "attempts": MAX_SLUG_ATTEMPTS }),
        ))
    }

    /// Retrieves a link by its slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this slug.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Link, AppError> {
        self.link_repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "slug": slug })))
    }

    /// Lists a user's links, newest first, with the total count.
    pub async fn list_for_user(
        &self,
        user_id: i64,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Link>, i64), AppError> {
        let offset = (page - 1).saturating_mul(per_page);

        let links = self
            .link_repository
            .list_by_user(user_id, offset, per_page)
            .await?;
        let total = self.link_repository.count_by_user(user_id).await?;

        Ok((links, total))
    }

    /// Lists every link with its creator's profile, newest first.
    pub async fn list_all(
        &self,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<LinkWithCreator>, i64), AppError> {
        let offset = (page - 1).saturating_mul(per_page);

        let links = self
            .link_repository
            .list_with_creator(offset, per_page)
            .await?;
        let total = self.link_repository.count_all().await?;

        Ok((links, total))
    }

    /// Total number of links, reported by the health check.
    pub async fn total_links(&self) -> Result<i64, AppError> {
        self.link_repository.count_all().await
    }
}

/// Builds the public short URL for a slug.
pub fn short_url(base_url: &str, slug: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), slug)
}

fn validate_custom_slug(slug: &str) -> Result<(), AppError> {
    if !is_valid_slug(slug) {
        return Err(AppError::bad_request(
            "Invalid custom slug",
            json!({
                "slug": slug,
                "reason": "Slug must be 1-50 characters of letters, digits, '_' or '-'"
            }),
        ));
    }

    if is_reserved(slug) {
        return Err(AppError::bad_request(
            "Invalid custom slug",
            json!({ "slug": slug, "reason": "Slug is reserved" }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn link_from(new_link: NewLink) -> Link {
        Link {
            id: 1,
            slug: new_link.slug,
            original_url: new_link.original_url,
            user_id: new_link.creator.user_id(),
            creator_ip: new_link.creator.creator_ip().map(str::to_string),
            clicks: 0,
            created_at: Utc::now(),
        }
    }

    fn slug_conflict() -> AppError {
        AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": "links_slug_key" }),
        )
    }

    #[tokio::test]
    async fn test_create_link_with_generated_slug() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .withf(|l| l.slug.len() == 6 && l.slug.chars().all(|c| c.is_ascii_lowercase()))
            .times(1)
            .returning(|l| Ok(link_from(l)));

        let service = LinkService::new(Arc::new(repo));
        let link = service
            .create_link(
                "https://example.com/page",
                None,
                Creator::Anonymous {
                    ip: Some("5.5.5.5".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(link.original_url, "https://example.com/page");
        assert_eq!(link.creator_ip.as_deref(), Some("5.5.5.5"));
        assert!(link.user_id.is_none());
    }

    #[tokio::test]
    async fn test_configured_slug_length_is_used() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .withf(|l| l.slug.len() == 9)
            .times(1)
            .returning(|l| Ok(link_from(l)));

        let service = LinkService::with_slug_length(Arc::new(repo), 9);
        let link = service
            .create_link("https://example.com", None, Creator::User(1))
            .await
            .unwrap();

        assert_eq!(link.slug.len(), 9);
    }

    #[tokio::test]
    async fn test_authenticated_link_never_stores_address() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .withf(|l| l.creator == Creator::User(42) && l.creator.creator_ip().is_none())
            .times(1)
            .returning(|l| Ok(link_from(l)));

        let service = LinkService::new(Arc::new(repo));
        let link = service
            .create_link("https://example.com", None, Creator::User(42))
            .await
            .unwrap();

        assert_eq!(link.user_id, Some(42));
        assert!(link.creator_ip.is_none());
    }

    #[tokio::test]
    async fn test_generated_slug_collision_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();

        let mut repo = MockLinkRepository::new();
        repo.expect_create().times(3).returning(move |l| {
            if seen.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(slug_conflict())
            } else {
                Ok(link_from(l))
            }
        });

        let service = LinkService::new(Arc::new(repo));
        let result = service
            .create_link("https://example.com", None, Creator::User(1))
            .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_generated_slug_gives_up_after_max_attempts() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .times(MAX_SLUG_ATTEMPTS)
            .returning(|_| Err(slug_conflict()));

        let service = LinkService::new(Arc::new(repo));
        let result = service
            .create_link("https://example.com", None, Creator::User(1))
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_custom_slug_is_used_verbatim() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .withf(|l| l.slug == "My_Promo-2024")
            .times(1)
            .returning(|l| Ok(link_from(l)));

        let service = LinkService::new(Arc::new(repo));
        let link = service
            .create_link("https://example.com", Some("My_Promo-2024"), Creator::User(1))
            .await
            .unwrap();

        assert_eq!(link.slug, "My_Promo-2024");
    }

    #[tokio::test]
    async fn test_custom_slug_conflict_is_not_retried() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|_| Err(slug_conflict()));

        let service = LinkService::new(Arc::new(repo));
        let err = service
            .create_link("https://example.com", Some("promo"), Creator::User(1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(err.to_string(), "Custom slug is already taken");
    }

    #[tokio::test]
    async fn test_blank_custom_slug_falls_back_to_generated() {
        let mut repo = MockLinkRepository::new();
        repo.expect_create()
            .withf(|l| l.slug.len() == DEFAULT_SLUG_LENGTH)
            .times(1)
            .returning(|l| Ok(link_from(l)));

        let service = LinkService::new(Arc::new(repo));
        let result = service
            .create_link("https://example.com", Some("   "), Creator::User(1))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_custom_slugs_rejected() {
        let too_long = "a".repeat(51);

        for slug in ["has space", "slash/slug", "émoji", too_long.as_str(), "api", "Health"] {
            let mut repo = MockLinkRepository::new();
            repo.expect_create().times(0);

            let service = LinkService::new(Arc::new(repo));
            let result = service
                .create_link("https://example.com", Some(slug), Creator::User(1))
                .await;

            assert!(
                matches!(result, Err(AppError::Validation { .. })),
                "slug {slug:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_unsafe_url_rejected_before_insert() {
        for url in [
            "http://127.0.0.1/admin",
            "http://169.254.169.254/latest/meta-data",
            "http://localhost:8080",
            "ftp://example.com/file",
            "not a url",
        ] {
            let mut repo = MockLinkRepository::new();
            repo.expect_create().times(0);

            let service = LinkService::new(Arc::new(repo));
            let result = service.create_link(url, None, Creator::User(1)).await;

            assert!(
                matches!(result, Err(AppError::UnsafeUrl { .. })),
                "{url} should be unsafe"
            );
        }
    }

    #[tokio::test]
    async fn test_get_by_slug_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_slug().times(1).returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(repo));
        let result = service.get_by_slug("missing").await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_for_user_computes_offset() {
        let mut repo = MockLinkRepository::new();
        repo.expect_list_by_user()
            .withf(|user_id, offset, limit| *user_id == 3 && *offset == 20 && *limit == 10)
            .times(1)
            .returning(|_, _, _| Ok(vec![]));
        repo.expect_count_by_user().times(1).returning(|_| Ok(25));

        let service = LinkService::new(Arc::new(repo));
        let (links, total) = service.list_for_user(3, 3, 10).await.unwrap();

        assert!(links.is_empty());
        assert_eq!(total, 25);
    }

    #[tokio::test]
    async fn test_list_for_user_huge_page_saturates_offset() {
        let mut repo = MockLinkRepository::new();
        repo.expect_list_by_user()
            .withf(|_, offset, _| *offset == i64::MAX)
            .times(1)
            .returning(|_, _, _| Ok(vec![]));
        repo.expect_count_by_user().times(1).returning(|_| Ok(2));

        let service = LinkService::new(Arc::new(repo));
        let (links, total) = service.list_for_user(1, i64::MAX, 10).await.unwrap();

        assert!(links.is_empty());
        assert_eq!(total, 2);
    }

    #[test]
    fn test_generated_slug_skips_routed_paths() {
        let mut drawn = ["health", "API", "qwerty"].into_iter();
        let slug = fresh_slug(|| drawn.next().unwrap().to_string());

        assert_eq!(slug, "qwerty");
        assert!(drawn.next().is_none());
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            short_url("https://sho.rt/", "abcdef"),
            "https://sho.rt/abcdef"
        );
    }
}
