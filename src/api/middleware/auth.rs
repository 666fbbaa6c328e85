//! Bearer token session extractors.
//!
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! - [`AuthUser`] requires a valid session (401 otherwise)
//! - [`MaybeUser`] accepts anonymous requests but rejects invalid tokens
//! - [`AdminUser`] requires an admin session (403 otherwise)

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_auth::AuthBearer;
use serde_json::json;

use crate::domain::entities::SessionUser;
use crate::error::AppError;
use crate::state::AppState;

/// An authenticated session.
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionUser);

/// A session if the request carried a token, `None` otherwise.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<SessionUser>);

/// An authenticated admin session.
#[derive(Debug, Clone)]
pub struct AdminUser(pub SessionUser);

/// Resolves the request's bearer token, if an `Authorization` header is present.
async fn session(parts: &mut Parts, state: &AppState) -> Result<Option<SessionUser>, AppError> {
    if !parts.headers.contains_key(AUTHORIZATION) {
        return Ok(None);
    }

    let AuthBearer(token) = AuthBearer::from_request_parts(parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Authorization header is missing or invalid" }),
            )
        })?;

    state.auth_service.authenticate(&token).await.map(Some)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        session(parts, state).await?.map(Self).ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Authorization header is missing or invalid" }),
            )
        })
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        session(parts, state).await.map(Self)
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let forbidden =
            || AppError::forbidden("Forbidden", json!({ "reason": "Admin role required" }));

        match session(parts, state).await {
            Ok(Some(user)) if user.is_admin() => Ok(Self(user)),
            Ok(_) | Err(AppError::Unauthorized { .. }) => Err(forbidden()),
            Err(e) => Err(e),
        }
    }
}
