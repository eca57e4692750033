use std::sync::Mutex;

use quiz_core::model::ScoreReport;

use super::service::{AnswerResolution, Presentation};

/// Rendering side of the quiz: receives everything the player should see.
///
/// Calls arrive synchronously from the controller, in order, on whatever task
/// drives it. Implementations are expected not to fail.
pub trait QuizSignals: Send + Sync {
    fn on_question_loaded(&self, presentation: &Presentation);

    fn on_answer_resolved(&self, resolution: &AnswerResolution);

    fn on_session_completed(&self, report: &ScoreReport);

    fn on_tick(&self, seconds_remaining: u32);
}

/// One signal as captured by `SignalRecorder`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedSignal {
    QuestionLoaded(Presentation),
    AnswerResolved(AnswerResolution),
    SessionCompleted(ScoreReport),
    Tick(u32),
}

/// Headless `QuizSignals` sink that keeps every signal in order.
#[derive(Debug, Default)]
pub struct SignalRecorder {
    signals: Mutex<Vec<RecordedSignal>>,
}

impl SignalRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn signals(&self) -> Vec<RecordedSignal> {
        self.signals
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn push(&self, signal: RecordedSignal) {
        if let Ok(mut guard) = self.signals.lock() {
            guard.push(signal);
        }
    }
}

impl QuizSignals for SignalRecorder {
    fn on_question_loaded(&self, presentation: &Presentation) {
        self.push(RecordedSignal::QuestionLoaded(presentation.clone()));
    }

    fn on_answer_resolved(&self, resolution: &AnswerResolution) {
        self.push(RecordedSignal::AnswerResolved(*resolution));
    }

    fn on_session_completed(&self, report: &ScoreReport) {
        self.push(RecordedSignal::SessionCompleted(*report));
    }

    fn on_tick(&self, seconds_remaining: u32) {
        self.push(RecordedSignal::Tick(seconds_remaining));
    }
}
