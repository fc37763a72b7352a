//! Login and logout

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar};

use crate::{
    error::{AppError, AppResult},
    models::user::LoginForm,
    views, AppState,
};

use super::{cookie, redirect_with_flash, take_flash, AuthenticatedUser, SESSION_COOKIE};

/// GET /login
pub async fn login_form(jar: PrivateCookieJar) -> AppResult<(PrivateCookieJar, Html<String>)> {
    let (jar, flash) = take_flash(jar);
    Ok((jar, views::login_page(flash.as_deref())?))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let username = form.username.unwrap_or_default();
    let password = form.password.unwrap_or_default();

    match state.services.auth.login(&username, &password).await {
        Ok((token, _user)) => {
            // A fresh login replaces whatever session this browser held
            if let Some(previous) = jar.get(SESSION_COOKIE) {
                state.services.auth.logout(previous.value()).await?;
            }
            let jar = jar.add(cookie(SESSION_COOKIE, token));
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(e @ AppError::InvalidCredentials) => Ok((
            StatusCode::UNAUTHORIZED,
            views::login_page(Some(e.to_string().as_str()))?,
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

/// GET /logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    jar: PrivateCookieJar,
) -> AppResult<Response> {
    state.services.auth.logout(&auth.session_token).await?;
    tracing::info!(user_id = auth.user.id, "User logged out");

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok(redirect_with_flash(jar, "/login", "You have been logged out"))
}
