use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{RefreshToken, RefreshTokenStore};
use crate::error::AuthError;

/// Postgres-backed refresh token store.
///
/// Tokens are stored by value; `revoked_at` is set once and never cleared.
#[derive(Debug, Clone)]
pub struct PgRefreshTokenStore {
    pool: PgPool,
}

impl PgRefreshTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn persistence_error(operation: &'static str, err: sqlx::Error) -> AuthError {
    tracing::error!(operation, error = %err, "Refresh token query failed");
    AuthError::Persistence(format!("{}: {}", operation, err))
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, AuthError> {
        let now = Utc::now();
        sqlx::query_as::<_, RefreshToken>(
            r#"
            INSERT INTO refresh_tokens (token, created_at, updated_at, user_id, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING token, user_id, created_at, updated_at, expires_at, revoked_at
            "#,
        )
        .bind(token)
        .bind(now)
        .bind(now)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| persistence_error("create_refresh_token", e))
    }

    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError> {
        sqlx::query_as::<_, RefreshToken>(
            r#"
            SELECT token, user_id, created_at, updated_at, expires_at, revoked_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| persistence_error("get_refresh_token", e))
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<u64, AuthError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked_at = $2, updated_at = $2
            WHERE token = $1
                AND revoked_at IS NULL
            "#,
        )
        .bind(token)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| persistence_error("revoke_refresh_token", e))?;

        Ok(result.rows_affected())
    }
}
