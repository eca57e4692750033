//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuizSettingsError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by the quiz session and its controller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session has not been started")]
    NotStarted,
    #[error("session already completed")]
    Completed,
    #[error("question index {index} is out of range for a bank of {total}")]
    OutOfRange { index: usize, total: usize },
    #[error("option {slot} does not exist; the question has {len} options")]
    InvalidOption { slot: usize, len: usize },
}

/// Errors emitted while loading a question bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("failed to read question file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse question file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("question file contains no valid questions")]
    Empty,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Settings(#[from] QuizSettingsError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
