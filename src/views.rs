//! Server-rendered HTML pages

use askama::Template;
use axum::{http::StatusCode, response::Html};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, NewBook},
};

#[derive(Template)]
#[template(path = "login.html")]
struct LoginPage<'a> {
    page_title: &'a str,
    signed_in: bool,
    flash: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "book_list.html")]
struct BookListPage<'a> {
    page_title: &'a str,
    signed_in: bool,
    flash: Option<&'a str>,
    books: &'a [Book],
}

#[derive(Template)]
#[template(path = "add_book.html")]
struct AddBookPage<'a> {
    page_title: &'a str,
    signed_in: bool,
    flash: Option<&'a str>,
    title: &'a str,
    author: &'a str,
    room: &'a str,
    shelf: &'a str,
}

#[derive(Template)]
#[template(path = "lend_book.html")]
struct LendBookPage<'a> {
    page_title: &'a str,
    signed_in: bool,
    flash: Option<&'a str>,
    book: &'a Book,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage<'a> {
    page_title: &'a str,
    signed_in: bool,
    flash: Option<&'a str>,
    message: &'a str,
}

fn render(template: &impl Template) -> AppResult<Html<String>> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::Internal(format!("Failed to render template: {}", e)))
}

pub fn login_page(flash: Option<&str>) -> AppResult<Html<String>> {
    render(&LoginPage {
        page_title: "Login",
        signed_in: false,
        flash,
    })
}

/// Book table shared by the full listing and the lent-books listing
pub fn book_list_page(title: &str, books: &[Book], flash: Option<&str>) -> AppResult<Html<String>> {
    render(&BookListPage {
        page_title: title,
        signed_in: true,
        flash,
        books,
    })
}

/// Add-book form, refilled with whatever was submitted
pub fn add_book_page(values: Option<&NewBook>, flash: Option<&str>) -> AppResult<Html<String>> {
    render(&AddBookPage {
        page_title: "Add book",
        signed_in: true,
        flash,
        title: values.map_or("", |v| v.title.as_str()),
        author: values.map_or("", |v| v.author.as_str()),
        room: values.map_or("", |v| v.room.as_str()),
        shelf: values.map_or("", |v| v.shelf.as_str()),
    })
}

pub fn lend_book_page(book: &Book, flash: Option<&str>) -> AppResult<Html<String>> {
    render(&LendBookPage {
        page_title: "Lend book",
        signed_in: true,
        flash,
        book,
    })
}

pub fn error_page(status: StatusCode, message: &str) -> AppResult<Html<String>> {
    render(&ErrorPage {
        page_title: status.canonical_reason().unwrap_or("Error"),
        signed_in: false,
        flash: None,
        message,
    })
}
