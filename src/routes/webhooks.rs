use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::UserRepository;
use crate::error::{AppError, DatabaseError};

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct WebhookData {
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct PolkaWebhook {
    pub event: String,
    pub data: WebhookData,
}

fn user_not_found() -> AppError {
    AppError::Database(DatabaseError::NotFound("User not found".to_string()))
}

/// POST /api/polka/webhooks
///
/// Payment provider callback. Only `user.upgraded` does anything; every other
/// event is acknowledged with 204 and ignored.
pub async fn polka_webhook(
    payload: web::Json<PolkaWebhook>,
    users: web::Data<UserRepository>,
) -> Result<HttpResponse, AppError> {
    if payload.event != USER_UPGRADED {
        tracing::debug!(event = %payload.event, "Ignoring webhook event");
        return Ok(HttpResponse::NoContent().finish());
    }

    let user_id = Uuid::parse_str(&payload.data.user_id).map_err(|_| user_not_found())?;

    let user = users.find_by_id(user_id).await?.ok_or_else(user_not_found)?;
    if user.is_chirpy_red {
        tracing::debug!(user_id = %user_id, "User already on Chirpy Red");
        return Ok(HttpResponse::NoContent().finish());
    }

    if !users.upgrade_to_chirpy_red(user_id).await? {
        return Err(user_not_found());
    }

    tracing::info!(user_id = %user_id, "User upgraded to Chirpy Red");

    Ok(HttpResponse::NoContent().finish())
}
