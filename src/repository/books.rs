//! Books repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookRow, NewBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// List every book in insertion order
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>("SELECT * FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Book::try_from).collect()
    }

    /// List books currently lent out
    pub async fn list_lent(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, BookRow>("SELECT * FROM books WHERE is_lent = 1 ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Book::try_from).collect()
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, BookRow>("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?
            .try_into()
    }

    /// Insert a new, available book
    pub async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let row = sqlx::query_as::<_, BookRow>(
            r#"
            INSERT INTO books (title, author, room, shelf, is_lent, lent_to, lent_date)
            VALUES (?, ?, ?, ?, 0, NULL, NULL)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.room)
        .bind(&book.shelf)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    /// Mark an available book as lent. Returns `false` when the book was
    /// not available at commit time.
    pub async fn mark_lent(&self, id: i64, borrower: &str, since: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE books SET is_lent = 1, lent_to = ?, lent_date = ? WHERE id = ? AND is_lent = 0",
        )
        .bind(borrower)
        .bind(since)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Mark a lent book as available again. Returns `false` when the book
    /// was not lent at commit time.
    pub async fn mark_returned(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE books SET is_lent = 0, lent_to = NULL, lent_date = NULL WHERE id = ? AND is_lent = 1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Count all books
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
