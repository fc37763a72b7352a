//! Data models for Bookshelf

pub mod book;
pub mod user;

// Re-export commonly used types
pub use book::{AddBookForm, Book, LendBookForm, LendingStatus, NewBook};
pub use user::{LoginForm, User};
