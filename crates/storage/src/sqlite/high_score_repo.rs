use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{HighScore, parse_high_score};
use sqlx::Row;

use crate::repository::{HIGH_SCORE_KEY, HighScoreRecord, HighScoreRepository, StorageError};

use super::SqliteRepository;

#[async_trait]
impl HighScoreRepository for SqliteRepository {
    async fn get_high_score(&self) -> Result<Option<HighScoreRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT value, updated_at
            FROM kv_store
            WHERE key = ?1
            ",
        )
        .bind(HIGH_SCORE_KEY)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let raw: String = row
            .try_get("value")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        // A malformed timestamp does not invalidate the score itself.
        let updated_at: Option<DateTime<Utc>> = row.try_get("updated_at").ok();

        if raw.trim().parse::<u32>().is_err() {
            tracing::warn!(raw = %raw, "stored high score is not a valid number, reading as 0");
        }

        Ok(Some(HighScoreRecord {
            score: parse_high_score(Some(&raw)),
            updated_at,
        }))
    }

    async fn save_high_score(
        &self,
        score: HighScore,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(HIGH_SCORE_KEY)
        .bind(score.value().to_string())
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
