/// Chirp Routes

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::ChirpRepository;
use crate::error::{AppError, DatabaseError, ErrorContext};
use crate::extractors::AuthenticatedUser;
use crate::validators::validate_chirp_body;

#[derive(Deserialize)]
pub struct ChirpRequest {
    pub body: String,
}

#[derive(Serialize)]
pub struct ValidateChirpResponse {
    pub cleaned_body: String,
}

fn chirp_not_found() -> AppError {
    AppError::Database(DatabaseError::NotFound("Chirp not found".to_string()))
}

/// Unparseable ids are reported the same as unknown ones
fn parse_chirp_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| chirp_not_found())
}

/// POST /api/validate_chirp
pub async fn validate_chirp(form: web::Json<ChirpRequest>) -> Result<HttpResponse, AppError> {
    let cleaned_body = validate_chirp_body(&form.body)?;

    Ok(HttpResponse::Ok().json(ValidateChirpResponse { cleaned_body }))
}

/// POST /api/chirps
///
/// # Errors
/// - 400: body longer than 140 characters
/// - 401: missing or invalid access token
pub async fn create_chirp(
    user: AuthenticatedUser,
    form: web::Json<ChirpRequest>,
    chirps: web::Data<ChirpRepository>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("chirp_create").with_user_id(user.user_id().to_string());

    let body = validate_chirp_body(&form.body)?;
    let chirp = chirps.create(&body, user.user_id()).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.user_id(),
        chirp_id = %chirp.id,
        "Chirp created"
    );

    Ok(HttpResponse::Created().json(chirp))
}

/// GET /api/chirps
pub async fn list_chirps(chirps: web::Data<ChirpRepository>) -> Result<HttpResponse, AppError> {
    let all = chirps.list().await?;

    Ok(HttpResponse::Ok().json(all))
}

/// GET /api/chirps/{chirp_id}
pub async fn get_chirp(
    path: web::Path<String>,
    chirps: web::Data<ChirpRepository>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = parse_chirp_id(&path)?;
    let chirp = chirps.find(chirp_id).await?.ok_or_else(chirp_not_found)?;

    Ok(HttpResponse::Ok().json(chirp))
}

/// DELETE /api/chirps/{chirp_id}
///
/// Only the author may delete a chirp (403 otherwise).
pub async fn delete_chirp(
    user: AuthenticatedUser,
    path: web::Path<String>,
    chirps: web::Data<ChirpRepository>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("chirp_delete").with_user_id(user.user_id().to_string());

    let chirp_id = parse_chirp_id(&path)?;
    let chirp = chirps.find(chirp_id).await?.ok_or_else(chirp_not_found)?;

    if chirp.user_id != user.user_id() {
        let err = AppError::Forbidden("You can only delete your own chirps".to_string());
        context.log_error(&err);
        return Err(err);
    }

    chirps.delete(chirp_id).await?;

    tracing::info!(
        request_id = %context.request_id,
        chirp_id = %chirp_id,
        "Chirp deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, ResponseError};

    #[test]
    fn test_malformed_chirp_id_is_not_found() {
        let err = parse_chirp_id("not-a-uuid").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_uuid_chirp_id_parses() {
        let id = Uuid::new_v4();
        assert_eq!(parse_chirp_id(&id.to_string()).unwrap(), id);
    }
}
