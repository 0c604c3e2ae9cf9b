/// Refresh Token Management
///
/// Refresh tokens are:
/// - 32 random bytes from the OS CSPRNG, hex-encoded (64 characters)
/// - Stored server-side with an expiry and a nullable revocation time
/// - Valid for 60 days unless revoked first
/// - Never rotated on refresh; a login session keeps its token until revoke or expiry

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::store::RefreshTokenStore;
use crate::error::AuthError;

/// Lifetime of a refresh token: 1440 hours
pub const REFRESH_TOKEN_LIFETIME_HOURS: i64 = 1440;

const REFRESH_TOKEN_BYTES: usize = 32;

/// A persisted refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Generate a new opaque refresh token
///
/// # Errors
/// Returns `AuthError::RandomSource` if the OS random source is unavailable
pub fn generate_refresh_token() -> Result<String, AuthError> {
    let mut key = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut key)
        .map_err(|e| AuthError::RandomSource(e.to_string()))?;

    Ok(hex::encode(key))
}

/// Generate a refresh token for `user_id` and store it
///
/// # Errors
/// - `AuthError::RandomSource` if token generation fails
/// - `AuthError::Persistence` if the store write fails
pub async fn issue_refresh_token(
    store: &dyn RefreshTokenStore,
    user_id: Uuid,
) -> Result<RefreshToken, AuthError> {
    let token = generate_refresh_token()?;
    let expires_at = Utc::now() + Duration::hours(REFRESH_TOKEN_LIFETIME_HOURS);

    let record = store
        .create_refresh_token(&token, user_id, expires_at)
        .await?;

    tracing::debug!(
        user_id = %user_id,
        expires_at = %record.expires_at,
        "Refresh token issued"
    );

    Ok(record)
}

/// Resolve a presented refresh token to the user that owns it
///
/// The token must exist, must not be revoked and must not be expired.
///
/// # Errors
/// `AuthError::NotFound`, `AuthError::Revoked` or `AuthError::Expired` for a
/// token that cannot be used, `AuthError::Persistence` if the lookup fails
pub async fn resolve_refresh_token(
    store: &dyn RefreshTokenStore,
    token: &str,
) -> Result<Uuid, AuthError> {
    let record = store
        .get_refresh_token(token)
        .await?
        .ok_or(AuthError::NotFound)?;

    if record.is_revoked() {
        return Err(AuthError::Revoked);
    }

    if record.is_expired() {
        return Err(AuthError::Expired);
    }

    Ok(record.user_id)
}

/// Revoke a refresh token
///
/// Returns `true` if a live token was revoked, `false` if the token was unknown
/// or already revoked.
///
/// # Errors
/// Returns `AuthError::Persistence` if the store write fails
pub async fn revoke_refresh_token(
    store: &dyn RefreshTokenStore,
    token: &str,
) -> Result<bool, AuthError> {
    let affected = store.revoke_refresh_token(token).await?;
    Ok(affected > 0)
}
