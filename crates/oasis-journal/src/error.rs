use thiserror::Error;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("Journal entry not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, JournalError>;
