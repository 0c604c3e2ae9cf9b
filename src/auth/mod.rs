/// Authentication module
///
/// Password hashing, access token issuance/verification, refresh token
/// lifecycle and bearer header extraction. Nothing here talks HTTP status codes;
/// every failure comes back as an `AuthError` for the caller to map.

mod bearer;
mod claims;
mod jwt;
mod password;
mod refresh_token;
mod store;

pub use bearer::get_bearer_token;
pub use claims::{Claims, ISSUER};
pub use jwt::{issue_access_token, verify_access_token};
pub use password::{check_password, hash_password, verify_credentials};
pub use refresh_token::{
    generate_refresh_token, issue_refresh_token, resolve_refresh_token, revoke_refresh_token,
    RefreshToken, REFRESH_TOKEN_LIFETIME_HOURS,
};
pub use store::{InMemoryRefreshTokenStore, RefreshTokenStore};
