/// Admin Routes
///
/// File-server metrics and the development-only reset.

use actix_web::{web, HttpResponse};

use crate::configuration::Platform;
use crate::db::UserRepository;
use crate::error::{AppError, ErrorContext};
use crate::middleware::HitCounter;

/// GET /admin/metrics
pub async fn metrics(counter: web::Data<HitCounter>) -> HttpResponse {
    let body = format!(
        r#"<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>"#,
        counter.get()
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// POST /admin/reset
///
/// The hit counter is always zeroed. Users (and through them every chirp and
/// refresh token) are only wiped on the `dev` platform; elsewhere the call is 403.
pub async fn reset(
    counter: web::Data<HitCounter>,
    platform: web::Data<Platform>,
    users: web::Data<UserRepository>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("admin_reset");
    counter.reset();

    if **platform != Platform::Dev {
        let err = AppError::Forbidden("Reset is only allowed in dev".to_string());
        context.log_error(&err);
        return Err(err);
    }

    let deleted = users.delete_all().await?;
    tracing::info!(
        request_id = %context.request_id,
        deleted_users = deleted,
        "Hit counter and users reset"
    );

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Hits reset to 0 and users deleted"))
}
