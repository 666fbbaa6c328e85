//! Bearer token authentication.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::SessionUser;
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns a 64-character lowercase hex digest. The admin CLI uses the same
/// function when issuing tokens, so both sides must share the secret.
pub fn hash_token(signing_secret: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Resolves bearer tokens to the user behind them.
///
/// Only token hashes are stored; an attacker with read-only access to the
/// database cannot forge a token without the server-side secret.
pub struct AuthService<R: TokenRepository + ?Sized> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository + ?Sized> AuthService<R> {
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Authenticates a raw token and returns its session.
    ///
    /// Updates the token's `last_used_at` on success; a failure to do so is
    /// logged and otherwise ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<SessionUser, AppError> {
        let token_hash = hash_token(&self.signing_secret, token);

        let session = self
            .repository
            .find_session(&token_hash)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({ "reason": "Invalid or revoked token" }),
                )
            })?;

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            tracing::warn!(error = %e, "Failed to update token last_used_at");
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Role;
    use crate::domain::repositories::MockTokenRepository;

    const SECRET: &str = "test-signing-secret";

    #[tokio::test]
    async fn test_authenticate_success() {
        let expected_hash = hash_token(SECRET, "valid-token");
        let lookup_hash = expected_hash.clone();

        let mut mock_repo = MockTokenRepository::new();
        mock_repo
            .expect_find_session()
            .withf(move |hash| hash == lookup_hash)
            .times(1)
            .returning(|_| {
                Ok(Some(SessionUser {
                    user_id: 7,
                    role: Role::Admin,
                }))
            });
        mock_repo
            .expect_update_last_used()
            .withf(move |hash| hash == expected_hash)
            .times(1)
            .returning(|_| Ok(()));

        let service = AuthService::new(Arc::new(mock_repo), SECRET.to_string());
        let session = service.authenticate("valid-token").await.unwrap();

        assert_eq!(session.user_id, 7);
        assert!(session.is_admin());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_token() {
        let mut mock_repo = MockTokenRepository::new();
        mock_repo
            .expect_find_session()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo.expect_update_last_used().times(0);

        let service = AuthService::new(Arc::new(mock_repo), SECRET.to_string());
        let result = service.authenticate("invalid-token").await;

        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_last_used_failure_does_not_reject() {
        let mut mock_repo = MockTokenRepository::new();
        mock_repo.expect_find_session().returning(|_| {
            Ok(Some(SessionUser {
                user_id: 1,
                role: Role::User,
            }))
        });
        mock_repo
            .expect_update_last_used()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = AuthService::new(Arc::new(mock_repo), SECRET.to_string());

        assert!(service.authenticate("token").await.is_ok());
    }

    #[test]
    fn test_hash_token_is_stable_hex() {
        let hash = hash_token(SECRET, "test-token");

        assert_eq!(hash, hash_token(SECRET, "test-token"));
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_token_depends_on_secret_and_input() {
        assert_ne!(hash_token(SECRET, "token1"), hash_token(SECRET, "token2"));
        assert_ne!(hash_token("secret-a", "token"), hash_token("secret-b", "token"));
    }
}
