//! User model and related types

use serde::Deserialize;
use sqlx::FromRow;

/// Administrative account allowed to sign in
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string, never the plaintext
    pub password_hash: String,
}

/// Login form as submitted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}
