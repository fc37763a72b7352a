//! Record counts for the diagnostics page

use serde::Serialize;

use crate::{error::AppResult, repository::Repository};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub users: i64,
    pub books: i64,
    pub sessions: i64,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn counts(&self) -> AppResult<RecordCounts> {
        Ok(RecordCounts {
            users: self.repository.users.count().await?,
            books: self.repository.books.count().await?,
            sessions: self.repository.sessions.count().await?,
        })
    }

    /// Database reachability for `/ready`
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
