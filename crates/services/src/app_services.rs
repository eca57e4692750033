use std::sync::Arc;

use quiz_core::model::{QuestionBank, QuizSettings};
use storage::repository::Storage;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::AppServicesError;
use crate::high_score_service::HighScoreService;
use crate::sessions::{QuizSession, QuizSignals, SessionController, TimerSignal};
use crate::Clock;

/// Assembles the quiz services around one question bank.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    bank: Arc<QuestionBank>,
    settings: QuizSettings,
    high_scores: HighScoreService,
    seed: Option<u64>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        bank: QuestionBank,
        settings: QuizSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, bank, settings))
    }

    /// Build services over an already assembled `Storage`.
    #[must_use]
    pub fn from_storage(
        storage: &Storage,
        clock: Clock,
        bank: QuestionBank,
        settings: QuizSettings,
    ) -> Self {
        let high_scores = HighScoreService::new(clock, Arc::clone(&storage.high_scores));
        Self::assemble(clock, bank, settings, high_scores)
    }

    /// Build services with no persistence at all.
    #[must_use]
    pub fn detached(clock: Clock, bank: QuestionBank, settings: QuizSettings) -> Self {
        Self::assemble(clock, bank, settings, HighScoreService::detached(clock))
    }

    fn assemble(
        clock: Clock,
        bank: QuestionBank,
        settings: QuizSettings,
        high_scores: HighScoreService,
    ) -> Self {
        Self {
            clock,
            bank: Arc::new(bank),
            settings,
            high_scores,
            seed: None,
        }
    }

    /// Make every session's shuffles reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn high_scores(&self) -> &HighScoreService {
        &self.high_scores
    }

    /// A fresh, not yet started session over the bank.
    #[must_use]
    pub fn new_session(&self) -> QuizSession {
        let bank = Arc::clone(&self.bank);
        let settings = self.settings.clone();
        match self.seed {
            Some(seed) => QuizSession::with_seed(bank, settings, self.clock, seed),
            None => QuizSession::new(bank, settings, self.clock),
        }
    }

    /// A controller wired to `signals`, sending timer signals to `timer_tx`.
    #[must_use]
    pub fn session_controller(
        &self,
        signals: Arc<dyn QuizSignals>,
        timer_tx: UnboundedSender<TimerSignal>,
    ) -> SessionController {
        SessionController::new(
            self.new_session(),
            signals,
            self.high_scores.clone(),
            timer_tx,
        )
    }
}
