/// Bearer token extraction from request headers

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

use crate::error::AuthError;

const BEARER_PREFIX: &str = "Bearer ";

/// Return the token following `Bearer ` in the `Authorization` header
///
/// The remainder is returned as-is, surrounding whitespace included.
///
/// # Errors
/// Returns `AuthError::MissingHeader` if the header is absent, is not UTF-8,
/// or uses another scheme
pub fn get_bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::to_string)
        .ok_or(AuthError::MissingHeader)
}
