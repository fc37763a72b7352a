//! Book model and lending state

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use validator::Validate;

use crate::error::AppError;

/// Lending state of a book. A book is either on its shelf or lent to
/// exactly one borrower since a given instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LendingStatus {
    Available,
    Lent { to: String, since: DateTime<Utc> },
}

impl LendingStatus {
    pub fn is_lent(&self) -> bool {
        matches!(self, LendingStatus::Lent { .. })
    }

    pub fn borrower(&self) -> Option<&str> {
        match self {
            LendingStatus::Lent { to, .. } => Some(to),
            LendingStatus::Available => None,
        }
    }

    pub fn lent_since(&self) -> Option<DateTime<Utc>> {
        match self {
            LendingStatus::Lent { since, .. } => Some(*since),
            LendingStatus::Available => None,
        }
    }
}

/// Physical book with its location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub room: String,
    pub shelf: String,
    pub status: LendingStatus,
}

/// Longest user-supplied text echoed back in a status message
pub const MESSAGE_TEXT_LIMIT: usize = 80;

/// Shortens `text` to at most `max_chars` characters, marking the cut with an ellipsis
pub fn clip(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

impl Book {
    /// Title shortened for status messages
    pub fn short_title(&self) -> String {
        clip(&self.title, MESSAGE_TEXT_LIMIT)
    }
}

/// Book row as stored in the database
#[derive(Debug, Clone, FromRow)]
pub(crate) struct BookRow {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub room: String,
    pub shelf: String,
    pub is_lent: bool,
    pub lent_to: Option<String>,
    pub lent_date: Option<DateTime<Utc>>,
}

impl TryFrom<BookRow> for Book {
    type Error = AppError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        let status = match (row.is_lent, row.lent_to, row.lent_date) {
            (true, Some(to), Some(since)) => LendingStatus::Lent { to, since },
            (false, None, None) => LendingStatus::Available,
            _ => {
                return Err(AppError::Internal(format!(
                    "Book {} has inconsistent lending columns",
                    row.id
                )))
            }
        };

        Ok(Book {
            id: row.id,
            title: row.title,
            author: row.author,
            room: row.room,
            shelf: row.shelf,
            status,
        })
    }
}

/// Add-book form as submitted; any field may be absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddBookForm {
    pub title: Option<String>,
    pub author: Option<String>,
    pub room: Option<String>,
    pub shelf: Option<String>,
}

/// Create book request
#[derive(Debug, Clone, Validate)]
pub struct NewBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "Room is required"))]
    pub room: String,
    #[validate(length(min = 1, message = "Shelf is required"))]
    pub shelf: String,
}

impl From<AddBookForm> for NewBook {
    fn from(form: AddBookForm) -> Self {
        let field = |value: Option<String>| value.map(|v| v.trim().to_string()).unwrap_or_default();
        Self {
            title: field(form.title),
            author: field(form.author),
            room: field(form.room),
            shelf: field(form.shelf),
        }
    }
}

/// Lend form as submitted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LendBookForm {
    pub borrower: Option<String>,
}
