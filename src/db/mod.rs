//! Postgres repositories for users, chirps and refresh tokens.

mod chirps;
mod refresh_tokens;
mod users;

pub use chirps::{Chirp, ChirpRepository};
pub use refresh_tokens::PgRefreshTokenStore;
pub use users::{User, UserRepository};
