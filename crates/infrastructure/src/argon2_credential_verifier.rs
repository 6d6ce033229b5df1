//! Argon2id credential verification against stored password hashes.
//!
//! Uses OWASP-recommended Argon2id parameters:
//! m=19456 (19 MiB), t=2, p=1.

use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version};
use async_trait::async_trait;
use deskrail_application::CredentialVerifier;
use deskrail_core::{AppError, AppResult};
use sqlx::PgPool;
use uuid::Uuid;

/// Argon2id-backed credential verifier.
///
/// Returns `None` for unknown emails, wrong passwords and deactivated
/// accounts alike; the caller never learns which case it was.
#[derive(Clone)]
pub struct Argon2CredentialVerifier {
    pool: PgPool,
    argon2: Argon2<'static>,
}

impl Argon2CredentialVerifier {
    /// Creates a verifier with recommended parameters.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        // OWASP Password Storage: Argon2id with m=19456, t=2, p=1.
        let params = Params::new(19456, 2, 1, None).unwrap_or_else(|_| Params::default());
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        Self { pool, argon2 }
    }
}

#[async_trait]
impl CredentialVerifier for Argon2CredentialVerifier {
    async fn verify(&self, email: &str, password: &str) -> AppResult<Option<Uuid>> {
        let row = sqlx::query_as::<_, (Uuid, String, bool)>(
            r#"
            SELECT id, password_hash, is_active
            FROM users
            WHERE email = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Unavailable(format!("failed to load credentials: {error}"))
        })?;

        let Some((user_id, stored_hash, is_active)) = row else {
            return Ok(None);
        };
        if !is_active {
            return Ok(None);
        }

        let parsed_hash = PasswordHash::new(stored_hash.as_str()).map_err(|error| {
            AppError::Internal(format!("failed to parse password hash: {error}"))
        })?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(Some(user_id)),
            Err(argon2::password_hash::Error::Password) => Ok(None),
            Err(error) => Err(AppError::Internal(format!(
                "password verification failed: {error}"
            ))),
        }
    }
}
