//! HTTP handlers for the Bookshelf pages

pub mod auth;
pub mod books;
pub mod health;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use tower_http::trace::TraceLayer;

use crate::{error::AppError, models::user::User, AppState};

pub(crate) const SESSION_COOKIE: &str = "session";
pub(crate) const FLASH_COOKIE: &str = "flash";

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(books::index))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/add_book", get(books::add_book_form).post(books::add_book))
        .route("/lend_book/:id", get(books::lend_book_form).post(books::lend_book))
        .route("/return_book/:id", get(books::return_book))
        .route("/lent_books", get(books::lent_books))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check));

    if state.config.diagnostics.enabled {
        tracing::warn!("Diagnostics route /debug is enabled");
        router = router.route("/debug", get(health::debug_counts));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// Extractor for the user bound to the request's session cookie
pub struct AuthenticatedUser {
    pub user: User,
    pub session_token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_headers(&parts.headers, state.cookie_key.clone());

        let session_token = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(AppError::Unauthenticated)?;

        let user = state.services.auth.resolve_session(&session_token).await?;

        Ok(AuthenticatedUser { user, session_token })
    }
}

fn cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Take the pending flash message, clearing it from the browser
pub(crate) fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<String>) {
    match jar.get(FLASH_COOKIE) {
        Some(flash) => {
            let message = flash.value().to_string();
            (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), Some(message))
        }
        None => (jar, None),
    }
}

/// Redirect and show `message` on the next rendered page
pub(crate) fn redirect_with_flash(jar: PrivateCookieJar, to: &str, message: impl Into<String>) -> Response {
    let jar = jar.add(cookie(FLASH_COOKIE, message.into()));
    (jar, Redirect::to(to)).into_response()
}
