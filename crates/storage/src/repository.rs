use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{HighScore, parse_high_score};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Well-known key the high score is stored under.
pub const HIGH_SCORE_KEY: &str = "jsQuizHighScore";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("storage backend unavailable")]
    Unavailable,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted high score together with when it was last written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighScoreRecord {
    pub score: HighScore,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Repository contract for the single persisted high score slot.
#[async_trait]
pub trait HighScoreRepository: Send + Sync {
    /// Read the stored high score.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet. A stored value that
    /// is not a non-negative integer reads as a score of 0.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get_high_score(&self) -> Result<Option<HighScoreRecord>, StorageError>;

    /// Overwrite the stored high score.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn save_high_score(
        &self,
        score: HighScore,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;
}

/// Simple in-memory key-value store for tests and sessions without a database.
///
/// Values are kept as raw strings so malformed persisted data can be simulated.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    values: Arc<Mutex<HashMap<String, (String, DateTime<Utc>)>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw value under `key`, bypassing validation.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw(
        &self,
        key: &str,
        value: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), (value.into(), at));
        Ok(())
    }

    /// Read the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).map(|(value, _)| value.clone()))
    }
}

#[async_trait]
impl HighScoreRepository for InMemoryRepository {
    async fn get_high_score(&self) -> Result<Option<HighScoreRecord>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(HIGH_SCORE_KEY).map(|(raw, at)| HighScoreRecord {
            score: parse_high_score(Some(raw)),
            updated_at: Some(*at),
        }))
    }

    async fn save_high_score(
        &self,
        score: HighScore,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.put_raw(HIGH_SCORE_KEY, score.to_string(), updated_at)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub high_scores: Arc<dyn HighScoreRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo: Arc<dyn HighScoreRepository> = Arc::new(InMemoryRepository::new());
        Self { high_scores: repo }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[tokio::test]
    async fn missing_value_reads_as_none() {
        let repo = InMemoryRepository::new();
        assert_eq!(repo.get_high_score().await.unwrap(), None);
    }

    #[tokio::test]
    async fn round_trips_high_score() {
        let repo = InMemoryRepository::new();
        repo.save_high_score(HighScore::new(4), fixed_now())
            .await
            .unwrap();

        let record = repo.get_high_score().await.unwrap().unwrap();
        assert_eq!(record.score, HighScore::new(4));
        assert_eq!(record.updated_at, Some(fixed_now()));
        assert_eq!(repo.get_raw(HIGH_SCORE_KEY).unwrap().as_deref(), Some("4"));
    }

    #[tokio::test]
    async fn garbage_value_reads_as_zero() {
        let repo = InMemoryRepository::new();
        repo.put_raw(HIGH_SCORE_KEY, "not a number", fixed_now())
            .unwrap();

        let record = repo.get_high_score().await.unwrap().unwrap();
        assert_eq!(record.score, HighScore::new(0));
    }

    #[tokio::test]
    async fn storage_in_memory_is_usable_through_trait_object() {
        let storage = Storage::in_memory();
        storage
            .high_scores
            .save_high_score(HighScore::new(2), fixed_now())
            .await
            .unwrap();
        let record = storage.high_scores.get_high_score().await.unwrap();
        assert_eq!(record.map(|r| r.score), Some(HighScore::new(2)));
    }
}
