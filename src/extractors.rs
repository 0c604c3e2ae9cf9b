use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::{get_bearer_token, verify_access_token};
use crate::configuration::JwtSettings;
use crate::error::AppError;

/// Caller identity taken from a valid `Authorization: Bearer <access token>` header.
///
/// Handlers that take this argument reject the request with 401 before running
/// when the header is missing or the token does not verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Uuid);

impl AuthenticatedUser {
    pub fn user_id(&self) -> Uuid {
        self.0
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let jwt = req
        .app_data::<web::Data<JwtSettings>>()
        .ok_or_else(|| AppError::Internal("JWT settings not registered".to_string()))?;

    let token = get_bearer_token(req.headers())?;
    let user_id = verify_access_token(&token, &jwt.secret).map_err(|e| {
        tracing::warn!(path = %req.path(), error = %e, "Access token rejected");
        e
    })?;

    Ok(AuthenticatedUser(user_id))
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Raw refresh token from the `Authorization: Bearer` header. Not verified here.
#[derive(Debug, Clone)]
pub struct BearerRefreshToken(pub String);

impl FromRequest for BearerRefreshToken {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            get_bearer_token(req.headers())
                .map(BearerRefreshToken)
                .map_err(AppError::from),
        )
    }
}
