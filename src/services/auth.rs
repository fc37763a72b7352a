//! Authentication and session service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use rand::RngCore;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::User,
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by username and password and open a session.
    /// Returns the session token and the authenticated user.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        if username.is_empty() || password.is_empty() {
            tracing::debug!("Login rejected: missing username or password");
            return Err(AppError::InvalidCredentials);
        }

        let user = match self.repository.users.get_by_username(username).await? {
            Some(user) => user,
            None => {
                tracing::warn!(username, "Login failed: unknown user");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !self.verify_password(&user, password)? {
            tracing::warn!(username, "Login failed: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let expires_at = i64::try_from(self.config.session_ttl_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Session lifetime of {} hours is out of range",
                    self.config.session_ttl_hours
                ))
            })?;

        let purged = self.repository.sessions.delete_expired().await?;
        if purged > 0 {
            tracing::debug!(purged, "Purged expired sessions");
        }

        let token = generate_session_token();
        self.repository.sessions.create(&token, user.id, expires_at).await?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok((token, user))
    }

    /// Resolve a session token to its user
    pub async fn resolve_session(&self, token: &str) -> AppResult<User> {
        let user_id = self
            .repository
            .sessions
            .get_user_id(token)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        match self.repository.users.get_by_id(user_id).await {
            Ok(user) => Ok(user),
            Err(AppError::NotFound(_)) => Err(AppError::Unauthenticated),
            Err(e) => Err(e),
        }
    }

    /// Destroy a session
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        self.repository.sessions.delete(token).await
    }

    /// Drop sessions past their expiry
    pub async fn purge_expired_sessions(&self) -> AppResult<u64> {
        self.repository.sessions.delete_expired().await
    }

    /// Seed the default account when no user exists yet.
    /// Returns `true` if a user was created.
    pub async fn ensure_default_user(&self) -> AppResult<bool> {
        if self.repository.users.count().await? > 0 {
            tracing::debug!("Default user already exists");
            return Ok(false);
        }

        let hash = self.hash_password(&self.config.default_password)?;
        let user = self
            .repository
            .users
            .create(&self.config.default_username, &hash)
            .await?;

        tracing::info!(username = %user.username, "Created default user");
        Ok(true)
    }

    /// Verify a password against the user's stored hash
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}

/// 256 bits of randomness, hex encoded
fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
