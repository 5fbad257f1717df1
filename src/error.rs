// Error types for the todo store and presenter

use thiserror::Error;

/// Everything that can go wrong while resolving, applying or listing todos.
///
/// Usage errors come from bad input and never touch the database.
/// The remaining variants are persistence failures.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Todo text cannot be empty (tags alone are not a title)")]
    EmptyTitle,

    #[error("Please provide the new todo text")]
    MissingText,

    #[error("Please provide an index")]
    MissingIndex,

    #[error("Invalid index: {0}")]
    InvalidIndex(String),

    #[error("Invalid status: {0}. Valid statuses are: all|a, done|d, pending|p")]
    InvalidStatus(String),

    #[error("Invalid format: {0}. Valid formats are: table, json, csv, txt")]
    InvalidFormat(String),

    #[error("Could not determine the home directory; set TODO_PATH")]
    NoHomeDir,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TodoError {
    /// True for errors caused by the caller's input rather than storage
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            TodoError::EmptyTitle
                | TodoError::MissingText
                | TodoError::MissingIndex
                | TodoError::InvalidIndex(_)
                | TodoError::InvalidStatus(_)
                | TodoError::InvalidFormat(_)
        )
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_usage() { 2 } else { 1 }
    }
}

pub type Result<T> = std::result::Result<T, TodoError>;
