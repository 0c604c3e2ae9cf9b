/// User Routes
///
/// Registration and credential updates.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::hash_password;
use crate::db::{User, UserRepository};
use crate::error::{AppError, ErrorContext};
use crate::extractors::AuthenticatedUser;
use crate::validators::{is_valid_email, is_valid_password};

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user; never carries the password hash
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

/// POST /api/users
///
/// # Errors
/// - 400: invalid email or empty password
/// - 409: email already registered
pub async fn create_user(
    form: web::Json<CredentialsRequest>,
    users: web::Data<UserRepository>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");

    let email = is_valid_email(&form.email)?;
    is_valid_password(&form.password)?;
    let hashed_password = hash_password(&form.password)?;

    let user = users.create(&email, &hashed_password).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User registered"
    );

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// PUT /api/users
///
/// Replaces the caller's email and password.
pub async fn update_user(
    user: AuthenticatedUser,
    form: web::Json<CredentialsRequest>,
    users: web::Data<UserRepository>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_update").with_user_id(user.user_id().to_string());

    let email = is_valid_email(&form.email)?;
    is_valid_password(&form.password)?;
    let hashed_password = hash_password(&form.password)?;

    let updated = users
        .update_credentials(user.user_id(), &email, &hashed_password)
        .await
        .map_err(|e| {
            context.log_error(&e);
            e
        })?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %updated.id,
        "User credentials updated"
    );

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_omits_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: "walt@breakingbad.com".to_string(),
            hashed_password: "$argon2id$v=19$secret".to_string(),
            is_chirpy_red: false,
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert_eq!(json["email"], "walt@breakingbad.com");
        assert_eq!(json["is_chirpy_red"], false);
        assert!(json.get("hashed_password").is_none());
        assert!(!json.to_string().contains("argon2"));
    }
}
