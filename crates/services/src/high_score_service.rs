use std::sync::Arc;

use quiz_core::model::HighScore;
use storage::repository::HighScoreRepository;

use crate::Clock;

/// Best-effort access to the persisted high score.
///
/// Storage failures are logged and swallowed: a failed read counts as no high
/// score and a failed write is dropped, so a quiz stays playable without any
/// working backend.
#[derive(Clone)]
pub struct HighScoreService {
    clock: Clock,
    repo: Option<Arc<dyn HighScoreRepository>>,
}

impl HighScoreService {
    #[must_use]
    pub fn new(clock: Clock, repo: Arc<dyn HighScoreRepository>) -> Self {
        Self {
            clock,
            repo: Some(repo),
        }
    }

    /// A service with no backend: reads return 0 and writes are discarded.
    #[must_use]
    pub fn detached(clock: Clock) -> Self {
        Self { clock, repo: None }
    }

    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.repo.is_some()
    }

    /// Read the high score, treating absence and failures as 0.
    pub async fn load(&self) -> HighScore {
        let Some(repo) = self.repo.as_ref() else {
            return HighScore::default();
        };
        match repo.get_high_score().await {
            Ok(Some(record)) => record.score,
            Ok(None) => HighScore::default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read high score, using 0");
                HighScore::default()
            }
        }
    }

    /// Persist a new high score. Returns whether the write went through.
    pub async fn record(&self, score: HighScore) -> bool {
        let Some(repo) = self.repo.as_ref() else {
            return false;
        };
        match repo.save_high_score(score, self.clock.now()).await {
            Ok(()) => {
                tracing::info!(high_score = score.value(), "high score updated");
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, high_score = score.value(), "failed to save high score");
                false
            }
        }
    }
}
