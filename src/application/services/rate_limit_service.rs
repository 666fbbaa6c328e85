//! Per-identity link creation limits over a trailing window.
//!
//! Counts are recomputed from link timestamps on every check; there is no
//! counter state to reset or share between instances. The check and the
//! subsequent insert are separate statements, so concurrent requests from one
//! identity can overshoot the limit by at most the number of in-flight
//! requests minus one. Treat the limit as best-effort, not a hard cap.

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Length of the trailing window, in seconds.
pub const WINDOW_SECONDS: i64 = 60 * 60;

/// Who is asking to create a link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub address: Option<String>,
    pub user_id: Option<i64>,
}

/// Limits applied per trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub allow_anonymous: bool,
    pub anon_limit: i64,
    pub user_limit: i64,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            allow_anonymous: true,
            anon_limit: 5,
            user_limit: 50,
        }
    }
}

/// Why a creation attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    AuthenticationRequired,
    LimitExceeded,
}

impl DenialReason {
    pub fn message(&self) -> &'static str {
        match self {
            DenialReason::AuthenticationRequired => "Authentication required",
            DenialReason::LimitExceeded => "Rate limit exceeded. Try again later.",
        }
    }

    pub fn suggested_status(&self) -> StatusCode {
        match self {
            DenialReason::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            DenialReason::LimitExceeded => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DenialReason::AuthenticationRequired => "authentication_required",
            DenialReason::LimitExceeded => "rate_limited",
        }
    }
}

impl From<DenialReason> for AppError {
    fn from(reason: DenialReason) -> Self {
        match reason {
            DenialReason::AuthenticationRequired => AppError::unauthorized(
                reason.message(),
                json!({ "reason": "Anonymous link creation is disabled" }),
            ),
            DenialReason::LimitExceeded => AppError::too_many_requests(
                reason.message(),
                json!({ "window_seconds": WINDOW_SECONDS }),
            ),
        }
    }
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Denied(DenialReason),
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed)
    }
}

/// Decides whether an identity may create another link.
pub struct RateLimitService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    policy: RateLimitPolicy,
}

impl<L: LinkRepository + ?Sized> RateLimitService<L> {
    pub fn new(link_repository: Arc<L>, policy: RateLimitPolicy) -> Self {
        Self {
            link_repository,
            policy,
        }
    }

    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Checks `identity` against the policy using the current time.
    pub async fn check(&self, identity: &Identity) -> Result<RateLimitDecision, AppError> {
        self.check_at(identity, Utc::now()).await
    }

    /// Checks `identity` against the policy as of `now`.
    ///
    /// Links created at or after `now - WINDOW_SECONDS` count toward the limit.
    /// An anonymous request without a resolvable address is allowed, since
    /// there is nothing to count against.
    ///
    /// # Errors
    ///
    /// Propagates store failures from the count query unchanged.
    pub async fn check_at(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<RateLimitDecision, AppError> {
        if !self.policy.allow_anonymous && identity.user_id.is_none() {
            return Ok(RateLimitDecision::Denied(
                DenialReason::AuthenticationRequired,
            ));
        }

        let since = now - Duration::seconds(WINDOW_SECONDS);

        let (count, limit) = match (identity.user_id, identity.address.as_deref()) {
            (Some(user_id), _) => (
                self.link_repository
                    .count_by_user_since(user_id, since)
                    .await?,
                self.policy.user_limit,
            ),
            (None, Some(address)) => (
                self.link_repository
                    .count_anonymous_by_ip_since(address, since)
                    .await?,
                self.policy.anon_limit,
            ),
            (None, None) => return Ok(RateLimitDecision::Allowed),
        };

        if count >= limit {
            return Ok(RateLimitDecision::Denied(DenialReason::LimitExceeded));
        }

        Ok(RateLimitDecision::Allowed)
    }
}
