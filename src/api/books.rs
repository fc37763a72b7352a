//! Book listing, creation, lending and returns

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::{
    error::{AppError, AppResult},
    models::book::{clip, AddBookForm, LendBookForm, NewBook, MESSAGE_TEXT_LIMIT},
    services::books::already_lent,
    views, AppState,
};

use super::{redirect_with_flash, take_flash, AuthenticatedUser};

/// GET /
pub async fn index(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    jar: PrivateCookieJar,
) -> AppResult<(PrivateCookieJar, Html<String>)> {
    let books = state.services.books.list_books().await?;
    let (jar, flash) = take_flash(jar);
    Ok((jar, views::book_list_page("Library", &books, flash.as_deref())?))
}

/// GET /lent_books
pub async fn lent_books(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    jar: PrivateCookieJar,
) -> AppResult<(PrivateCookieJar, Html<String>)> {
    let books = state.services.books.list_lent_books().await?;
    let (jar, flash) = take_flash(jar);
    Ok((jar, views::book_list_page("Lent books", &books, flash.as_deref())?))
}

/// GET /add_book
pub async fn add_book_form(_auth: AuthenticatedUser) -> AppResult<Html<String>> {
    views::add_book_page(None, None)
}

/// POST /add_book
pub async fn add_book(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    jar: PrivateCookieJar,
    Form(form): Form<AddBookForm>,
) -> AppResult<Response> {
    let book = NewBook::from(form);

    match state.services.books.add_book(book.clone()).await {
        Ok(_) => Ok(redirect_with_flash(jar, "/", "Book added successfully!")),
        Err(AppError::Validation(msg)) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            views::add_book_page(Some(&book), Some(msg.as_str()))?,
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

/// GET /lend_book/:id
pub async fn lend_book_form(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let book = match state.services.books.get_book(id).await {
        Ok(book) => book,
        Err(e) if e.is_user_facing() => return Ok(redirect_with_flash(jar, "/", e.to_string())),
        Err(e) => return Err(e),
    };

    if book.status.is_lent() {
        let message = already_lent(&book).to_string();
        return Ok(redirect_with_flash(jar, "/", message));
    }

    Ok(views::lend_book_page(&book, None)?.into_response())
}

/// POST /lend_book/:id
pub async fn lend_book(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
    Form(form): Form<LendBookForm>,
) -> AppResult<Response> {
    let borrower = form.borrower.unwrap_or_default();

    match state.services.books.lend_book(id, &borrower).await {
        Ok(book) => {
            let message = format!(
                "\"{}\" lent to {}",
                book.short_title(),
                clip(borrower.trim(), MESSAGE_TEXT_LIMIT)
            );
            Ok(redirect_with_flash(jar, "/", message))
        }
        Err(AppError::Validation(msg)) => {
            let book = state.services.books.get_book(id).await?;
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                views::lend_book_page(&book, Some(msg.as_str()))?,
            )
                .into_response())
        }
        Err(e) if e.is_user_facing() => Ok(redirect_with_flash(jar, "/", e.to_string())),
        Err(e) => Err(e),
    }
}

/// GET /return_book/:id
pub async fn return_book(
    State(state): State<AppState>,
    _auth: AuthenticatedUser,
    jar: PrivateCookieJar,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    match state.services.books.return_book(id).await {
        Ok(book) => Ok(redirect_with_flash(
            jar,
            "/",
            format!("\"{}\" returned", book.short_title()),
        )),
        Err(e) if e.is_user_facing() => Ok(redirect_with_flash(jar, "/", e.to_string())),
        Err(e) => Err(e),
    }
}
