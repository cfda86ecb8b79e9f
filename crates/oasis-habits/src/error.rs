use thiserror::Error;

#[derive(Debug, Error)]
pub enum HabitError {
    #[error("Habit not found: {0}")]
    NotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// A category cannot be deleted while habits still reference it.
    #[error("Category still has habits attached: {0}")]
    CategoryInUse(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, HabitError>;
