//! Book inventory and lending service

use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, NewBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Books currently lent out
    pub async fn list_lent_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list_lent().await
    }

    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Create a new available book. Nothing is written unless every field is present.
    pub async fn add_book(&self, book: NewBook) -> AppResult<Book> {
        book.validate()
            .map_err(|_| AppError::Validation("Please fill in all fields".to_string()))?;

        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = created.id, title = %created.title, "Book added");
        Ok(created)
    }

    /// Lend an available book to `borrower`
    pub async fn lend_book(&self, id: i64, borrower: &str) -> AppResult<Book> {
        let book = self.repository.books.get_by_id(id).await?;

        if book.status.is_lent() {
            return Err(already_lent(&book));
        }

        let borrower = borrower.trim();
        if borrower.is_empty() {
            return Err(AppError::Validation("Please enter the borrower's name".to_string()));
        }

        if !self.repository.books.mark_lent(id, borrower, Utc::now()).await? {
            // Lost a race against another lend
            let book = self.repository.books.get_by_id(id).await?;
            return Err(already_lent(&book));
        }

        tracing::info!(book_id = id, borrower, "Book lent");
        self.repository.books.get_by_id(id).await
    }

    /// Return a lent book to its shelf
    pub async fn return_book(&self, id: i64) -> AppResult<Book> {
        let book = self.repository.books.get_by_id(id).await?;

        if !book.status.is_lent() || !self.repository.books.mark_returned(id).await? {
            return Err(AppError::InvalidTransition(format!(
                "\"{}\" is not currently lent",
                book.short_title()
            )));
        }

        tracing::info!(book_id = id, "Book returned");
        self.repository.books.get_by_id(id).await
    }
}

pub(crate) fn already_lent(book: &Book) -> AppError {
    AppError::InvalidTransition(format!("\"{}\" is already lent", book.short_title()))
}
