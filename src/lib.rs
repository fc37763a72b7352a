//! Bookshelf
//!
//! A small web application tracking where an organization's physical books
//! live (room and shelf) and who currently has them on loan.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::Repository;
use services::Services;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<Services>,
    cookie_key: Key,
}

impl AppState {
    pub fn new(config: AppConfig, repository: Repository) -> Self {
        let cookie_key = derive_cookie_key(&config.auth.secret_key);
        let services = Services::new(repository, config.auth.clone());

        Self {
            config: Arc::new(config),
            services: Arc::new(services),
            cookie_key,
        }
    }

    /// Migrate the schema, drop stale sessions and seed the default user,
    /// then build the state
    pub async fn initialize(config: AppConfig, repository: Repository) -> AppResult<Self> {
        repository.migrate().await?;
        tracing::info!("Database migrations completed");

        let state = Self::new(config, repository);

        let purged = state.services.auth.purge_expired_sessions().await?;
        if purged > 0 {
            tracing::info!(purged, "Removed expired sessions");
        }
        state.services.auth.ensure_default_user().await?;

        Ok(state)
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Cookie encryption needs 64 bytes of key material; any secret length is
/// accepted and stretched through SHA-512.
fn derive_cookie_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}
