/// JWT Claims structure
///
/// Registered claims only (RFC 7519): issuer, subject, issued-at, expiry.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Issuer label stamped into every access token
pub const ISSUER: &str = "chirpy";

/// JWT Claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Issuer
    pub iss: String,
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Claims for `user_id`, valid for `ttl` from now
    ///
    /// # Errors
    /// Returns `AuthError::Signing` if `now + ttl` is not a representable time
    pub fn new(user_id: Uuid, ttl: Duration) -> Result<Self, AuthError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Signing("ttl out of range".to_string()))?;

        Ok(Self {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// Returns `AuthError::InvalidToken` if the subject is not a UUID
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AuthError::InvalidToken("subject is not a user id".to_string()))
    }

    /// A token is expired from the second its `exp` is reached
    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, Duration::hours(1)).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_zero_ttl_is_expired() {
        let claims = Claims::new(Uuid::new_v4(), Duration::zero()).unwrap();

        assert!(claims.is_expired());
    }

    #[test]
    fn test_user_id_extraction() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, Duration::hours(1)).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_invalid_user_id() {
        let mut claims = Claims::new(Uuid::new_v4(), Duration::hours(1)).unwrap();
        claims.sub = "invalid-uuid".to_string();

        assert!(matches!(claims.user_id(), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_unrepresentable_expiry_is_error() {
        let result = Claims::new(Uuid::new_v4(), Duration::MAX);
        assert!(matches!(result, Err(AuthError::Signing(_))));
    }
}
