/// Access Token Issuance and Verification
///
/// HS256-signed JWTs carrying only the user id. Verification is stateless:
/// signature, issuer and expiry are the whole check.

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::{Claims, ISSUER};
use crate::error::AuthError;

/// Sign an access token for `user_id` that expires after `ttl`
///
/// # Errors
/// Returns `AuthError::Signing` if the secret is empty, `ttl` pushes the expiry
/// out of range, or encoding fails
pub fn issue_access_token(user_id: Uuid, secret: &str, ttl: Duration) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::Signing("signing secret is empty".to_string()));
    }

    let claims = Claims::new(user_id, ttl)?;

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))
}

/// Verify an access token and return the user id it was issued for
///
/// # Errors
/// - `AuthError::ExpiredToken` once the expiry second is reached
/// - `AuthError::InvalidToken` for a bad signature, wrong issuer, malformed token
///   or a subject that is not a UUID
pub fn verify_access_token(token: &str, secret: &str) -> Result<Uuid, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken(e.to_string()),
    })?;

    // jsonwebtoken still accepts exp == now
    if claims.is_expired() {
        return Err(AuthError::ExpiredToken);
    }

    claims.user_id()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    #[test]
    fn test_issue_and_verify_token() {
        let user_id = Uuid::new_v4();

        let token = issue_access_token(user_id, SECRET, Duration::hours(2))
            .expect("Failed to issue token");
        let verified = verify_access_token(&token, SECRET).expect("Failed to verify token");

        assert_eq!(verified, user_id);
    }

    #[test]
    fn test_zero_ttl_token_is_expired() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, Duration::zero())
            .expect("Failed to issue token");

        assert_eq!(verify_access_token(&token, SECRET), Err(AuthError::ExpiredToken));
    }

    #[test]
    fn test_past_token_is_expired() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, Duration::seconds(-120))
            .expect("Failed to issue token");

        assert_eq!(verify_access_token(&token, SECRET), Err(AuthError::ExpiredToken));
    }

    #[test]
    fn test_wrong_secret() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, Duration::hours(2))
            .expect("Failed to issue token");

        let result = verify_access_token(&token, "wrongPassword");
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));

        let result = verify_access_token(&token, "");
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_garbage_token() {
        let result = verify_access_token("garbage", SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));

        let result = verify_access_token("invalid.token.here", SECRET);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_tampered_token() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, Duration::hours(2))
            .expect("Failed to issue token");

        let tampered = format!("{}X", token);
        assert!(matches!(
            verify_access_token(&tampered, SECRET),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_wrong_issuer() {
        let claims = Claims {
            iss: "someone-else".to_string(),
            ..Claims::new(Uuid::new_v4(), Duration::hours(1)).unwrap()
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("Failed to encode token");

        assert!(matches!(
            verify_access_token(&token, SECRET),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_non_uuid_subject() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            ..Claims::new(Uuid::new_v4(), Duration::hours(1)).unwrap()
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .expect("Failed to encode token");

        assert!(matches!(
            verify_access_token(&token, SECRET),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_empty_secret_cannot_sign() {
        let result = issue_access_token(Uuid::new_v4(), "", Duration::hours(1));
        assert!(matches!(result, Err(AuthError::Signing(_))));
    }

    #[test]
    fn test_overflowing_ttl_cannot_sign() {
        let result = issue_access_token(Uuid::new_v4(), SECRET, Duration::MAX);
        assert!(matches!(result, Err(AuthError::Signing(_))));

        let result = issue_access_token(Uuid::new_v4(), SECRET, Duration::MIN);
        assert!(matches!(result, Err(AuthError::Signing(_))));
    }
}
