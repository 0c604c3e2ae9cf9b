//! Refresh token persistence seam.
//!
//! The refresh token manager only needs three operations; anything that can
//! provide them (Postgres, memory) can back it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::auth::refresh_token::RefreshToken;
use crate::error::AuthError;

/// Storage operations consumed by the refresh token manager.
///
/// Implementations map their own failures to `AuthError::Persistence`.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a new token and return the stored record.
    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, AuthError>;

    /// Look a token up by value.
    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError>;

    /// Mark a token revoked. Returns how many rows changed (0 or 1).
    async fn revoke_refresh_token(&self, token: &str) -> Result<u64, AuthError>;
}

/// Refresh token store held in process memory.
///
/// Used by tests and local tooling; state is lost on restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRefreshTokenStore {
    tokens: Arc<Mutex<HashMap<String, RefreshToken>>>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tokens, revoked ones included.
    pub async fn len(&self) -> usize {
        self.tokens.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.lock().await.is_empty()
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, AuthError> {
        let mut tokens = self.tokens.lock().await;
        if tokens.contains_key(token) {
            return Err(AuthError::Persistence("duplicate refresh token".to_string()));
        }

        let now = Utc::now();
        let record = RefreshToken {
            token: token.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
            expires_at,
            revoked_at: None,
        };
        tokens.insert(token.to_string(), record.clone());

        Ok(record)
    }

    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError> {
        Ok(self.tokens.lock().await.get(token).cloned())
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<u64, AuthError> {
        let mut tokens = self.tokens.lock().await;
        match tokens.get_mut(token) {
            Some(record) if record.revoked_at.is_none() => {
                let now = Utc::now();
                record.revoked_at = Some(now);
                record.updated_at = now;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}
