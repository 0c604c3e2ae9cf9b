/// Authentication Routes
///
/// Login, access token refresh and refresh token revocation.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{
    issue_access_token, issue_refresh_token, resolve_refresh_token, revoke_refresh_token,
    verify_credentials, RefreshTokenStore,
};
use crate::configuration::JwtSettings;
use crate::db::UserRepository;
use crate::error::{AppError, AuthError, DatabaseError, ErrorContext};
use crate::extractors::BearerRefreshToken;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User view plus a fresh access token and refresh token
#[derive(Serialize)]
pub struct LoginResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// POST /api/login
///
/// # Errors
/// - 401: unknown email or wrong password, with the same message for both
/// - 500: hashing, signing or token store failure
pub async fn login(
    form: web::Json<LoginRequest>,
    users: web::Data<UserRepository>,
    store: web::Data<dyn RefreshTokenStore>,
    jwt: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");
    let email = form.email.trim();

    let user = users
        .find_by_email(email)
        .await?
        .ok_or(AppError::Auth(AuthError::Mismatch))?;

    verify_credentials(&form.password, &user.hashed_password)?;

    let token = issue_access_token(user.id, &jwt.secret, jwt.access_token_ttl())?;
    let refresh = issue_refresh_token(store.get_ref(), user.id).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User logged in"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        id: user.id,
        created_at: user.created_at,
        updated_at: user.updated_at,
        email: user.email,
        is_chirpy_red: user.is_chirpy_red,
        token,
        refresh_token: refresh.token,
    }))
}

/// POST /api/refresh
///
/// Exchanges a live refresh token (bearer) for a new access token. The refresh
/// token itself is left untouched.
pub async fn refresh(
    bearer: BearerRefreshToken,
    store: web::Data<dyn RefreshTokenStore>,
    jwt: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    let user_id = resolve_refresh_token(store.get_ref(), &bearer.0)
        .await
        .map_err(|e| {
            let err = AppError::Auth(e);
            context.log_error(&err);
            err
        })?;

    let token = issue_access_token(user_id, &jwt.secret, jwt.access_token_ttl())?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user_id,
        "Access token refreshed"
    );

    Ok(HttpResponse::Ok().json(RefreshResponse { token }))
}

/// POST /api/revoke
///
/// 204 when a live refresh token was revoked, 404 when nothing changed.
pub async fn revoke(
    bearer: BearerRefreshToken,
    store: web::Data<dyn RefreshTokenStore>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_revoke");

    if !revoke_refresh_token(store.get_ref(), &bearer.0).await? {
        return Err(AppError::Database(DatabaseError::NotFound(
            "No active refresh token to revoke".to_string(),
        )));
    }

    tracing::info!(request_id = %context.request_id, "Refresh token revoked");

    Ok(HttpResponse::NoContent().finish())
}
