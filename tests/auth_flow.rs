//! End-to-end credential lifecycle against the in-memory refresh token store:
//! register, login, use the access token, refresh, revoke, refresh again.

use actix_web::http::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use chirpy::auth::{
    get_bearer_token, hash_password, issue_access_token, issue_refresh_token,
    resolve_refresh_token, revoke_refresh_token, verify_access_token, verify_credentials,
    InMemoryRefreshTokenStore, RefreshTokenStore,
};
use chirpy::error::AuthError;
use chrono::{Duration, Utc};
use uuid::Uuid;

const SECRET: &str = "flow-secret";

struct Account {
    id: Uuid,
    hashed_password: String,
}

fn register(password: &str) -> Account {
    Account {
        id: Uuid::new_v4(),
        hashed_password: hash_password(password).expect("Failed to hash password"),
    }
}

fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    headers
}

#[tokio::test]
async fn register_login_refresh_revoke() {
    let store = InMemoryRefreshTokenStore::new();
    let account = register("04234");

    // Login
    assert_eq!(
        verify_credentials("wrong", &account.hashed_password),
        Err(AuthError::Mismatch)
    );
    verify_credentials("04234", &account.hashed_password).expect("Password should match");

    let access = issue_access_token(account.id, SECRET, Duration::hours(1)).unwrap();
    let refresh = issue_refresh_token(&store, account.id).await.unwrap();

    // Authenticated request
    let presented = get_bearer_token(&bearer(&access)).unwrap();
    assert_eq!(verify_access_token(&presented, SECRET).unwrap(), account.id);

    // Refresh
    let presented = get_bearer_token(&bearer(&refresh.token)).unwrap();
    let user_id = resolve_refresh_token(&store, &presented).await.unwrap();
    assert_eq!(user_id, account.id);
    let renewed = issue_access_token(user_id, SECRET, Duration::hours(1)).unwrap();
    assert_eq!(verify_access_token(&renewed, SECRET).unwrap(), account.id);

    // Revoke, then refresh fails
    assert!(revoke_refresh_token(&store, &presented).await.unwrap());
    assert_eq!(
        resolve_refresh_token(&store, &presented).await,
        Err(AuthError::Revoked)
    );

    // Access tokens already issued stay valid until they expire
    assert_eq!(verify_access_token(&renewed, SECRET).unwrap(), account.id);
}

#[tokio::test]
async fn sessions_are_independent() {
    let store = InMemoryRefreshTokenStore::new();
    let account = register("hunter2");

    let phone = issue_refresh_token(&store, account.id).await.unwrap();
    let laptop = issue_refresh_token(&store, account.id).await.unwrap();
    assert_ne!(phone.token, laptop.token);
    assert_eq!(store.len().await, 2);

    assert!(revoke_refresh_token(&store, &phone.token).await.unwrap());

    assert_eq!(
        resolve_refresh_token(&store, &phone.token).await,
        Err(AuthError::Revoked)
    );
    assert_eq!(
        resolve_refresh_token(&store, &laptop.token).await.unwrap(),
        account.id
    );
}

#[tokio::test]
async fn stale_refresh_tokens_are_rejected() {
    let store = InMemoryRefreshTokenStore::new();
    let user_id = Uuid::new_v4();

    store
        .create_refresh_token("expired-token", user_id, Utc::now() - Duration::minutes(1))
        .await
        .unwrap();

    assert_eq!(
        resolve_refresh_token(&store, "expired-token").await,
        Err(AuthError::Expired)
    );
    assert_eq!(
        resolve_refresh_token(&store, "never-issued").await,
        Err(AuthError::NotFound)
    );
    assert!(!revoke_refresh_token(&store, "never-issued").await.unwrap());
}

#[test]
fn access_token_for_one_secret_fails_under_another() {
    let user_id = Uuid::new_v4();
    let token = issue_access_token(user_id, SECRET, Duration::hours(1)).unwrap();

    assert!(matches!(
        verify_access_token(&token, "rotated-secret"),
        Err(AuthError::InvalidToken(_))
    ));
    assert_eq!(
        verify_access_token(&token, SECRET).unwrap(),
        user_id
    );
}
