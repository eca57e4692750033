use std::sync::Arc;

use quiz_core::model::{OptionSlot, PresentationId, ScoreReport, SessionPhase, SessionState};
use tokio::sync::mpsc::UnboundedSender;

use super::service::{AdvanceOutcome, AnswerResolution, Presentation, QuizSession, SelectOutcome};
use super::signals::QuizSignals;
use super::timer::{QuestionTimer, TimerEvent, TimerSignal};
use crate::error::SessionError;
use crate::high_score_service::HighScoreService;

/// What a controller call ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerStep {
    /// A question was put on screen and its timer started.
    Presented(PresentationId),
    /// The current question was answered.
    Resolved(AnswerResolution),
    /// A timer tick was forwarded to the renderer.
    Ticked(u32),
    /// The session finished.
    Completed(ScoreReport),
    /// The request did not apply to the current state and changed nothing.
    Ignored,
}

/// Drives a `QuizSession`: owns the per-question timer, forwards signals to the
/// renderer and persists the high score at the end of a session.
///
/// All entry points take `&mut self`, so a timer expiry and a player selection
/// for the same question are handled one after the other. Whichever arrives
/// first wins; the other finds the question already resolved and is ignored.
pub struct SessionController {
    session: QuizSession,
    signals: Arc<dyn QuizSignals>,
    high_scores: HighScoreService,
    timer_tx: UnboundedSender<TimerSignal>,
    timer: Option<QuestionTimer>,
}

impl SessionController {
    /// Build a controller. Timer signals are sent to `timer_tx`; the owner of the
    /// receiving end must feed them back through `handle_timer`.
    #[must_use]
    pub fn new(
        session: QuizSession,
        signals: Arc<dyn QuizSignals>,
        high_scores: HighScoreService,
        timer_tx: UnboundedSender<TimerSignal>,
    ) -> Self {
        Self {
            session,
            signals,
            high_scores,
            timer_tx,
            timer: None,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    /// True while a question timer is counting down.
    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.timer.as_ref().is_some_and(QuestionTimer::is_active)
    }

    /// Start a fresh session: read the high score, reshuffle, show question 0.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from the session.
    pub async fn start(&mut self) -> Result<ControllerStep, SessionError> {
        self.cancel_timer();
        let high_score = self.high_scores.load().await;
        let outcome = self.session.start(high_score)?;
        tracing::info!(
            total = self.session.state().total_questions(),
            high_score = high_score.value(),
            "quiz session started"
        );
        self.apply(outcome).await
    }

    /// Restart regardless of how the previous session ended.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from the session.
    pub async fn request_restart(&mut self) -> Result<ControllerStep, SessionError> {
        tracing::debug!(phase = ?self.session.phase(), "restart requested");
        self.start().await
    }

    /// Show the question at `index`, replacing any question on screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` past the last question; the session
    /// must be finished through `request_advance` instead.
    pub fn load_question(&mut self, index: usize) -> Result<ControllerStep, SessionError> {
        match self.session.load_question(index) {
            Ok(presentation) => Ok(self.present(&presentation)),
            Err(err) => {
                if matches!(err, SessionError::OutOfRange { .. }) {
                    tracing::error!(%err, "question load past the end of the bank");
                }
                Err(err)
            }
        }
    }

    /// Player picked the option in `slot`.
    ///
    /// Ignored once the question is answered or timed out.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `start` and
    /// `SessionError::InvalidOption` for a slot that is not on screen.
    pub fn submit_answer(&mut self, slot: OptionSlot) -> Result<ControllerStep, SessionError> {
        match self.session.select_answer(slot)? {
            SelectOutcome::Resolved(resolution) => {
                self.cancel_timer();
                tracing::debug!(
                    slot = slot.index(),
                    correct = resolution.is_correct,
                    score = resolution.score,
                    "answer resolved"
                );
                self.signals.on_answer_resolved(&resolution);
                Ok(ControllerStep::Resolved(resolution))
            }
            SelectOutcome::Ignored => {
                tracing::debug!(slot = slot.index(), "selection ignored");
                Ok(ControllerStep::Ignored)
            }
        }
    }

    /// Player asked to move on. Only honoured once the question is answered.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from the session.
    pub async fn request_advance(&mut self) -> Result<ControllerStep, SessionError> {
        if self.session.phase() != SessionPhase::Answered {
            tracing::debug!(phase = ?self.session.phase(), "advance ignored");
            return Ok(ControllerStep::Ignored);
        }
        let outcome = self.session.advance()?;
        self.apply(outcome).await
    }

    /// Feed back a signal from the question timer.
    ///
    /// Signals from any timer other than the running one are dropped, which
    /// covers signals queued just before a cancellation.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from the session.
    pub async fn handle_timer(
        &mut self,
        signal: TimerSignal,
    ) -> Result<ControllerStep, SessionError> {
        let current = self
            .timer
            .as_ref()
            .is_some_and(|timer| timer.presentation() == signal.presentation);
        if !current {
            tracing::debug!(presentation = %signal.presentation, "stale timer signal dropped");
            return Ok(ControllerStep::Ignored);
        }

        match signal.event {
            TimerEvent::Tick(remaining) => {
                self.signals.on_tick(remaining);
                Ok(ControllerStep::Ticked(remaining))
            }
            TimerEvent::Expired => {
                self.cancel_timer();
                match self.session.timeout(signal.presentation)? {
                    Some(outcome) => {
                        tracing::debug!(presentation = %signal.presentation, "question timed out");
                        self.apply(outcome).await
                    }
                    None => Ok(ControllerStep::Ignored),
                }
            }
        }
    }

    async fn apply(&mut self, outcome: AdvanceOutcome) -> Result<ControllerStep, SessionError> {
        match outcome {
            AdvanceOutcome::Presented(presentation) => Ok(self.present(&presentation)),
            AdvanceOutcome::Completed(report) => {
                self.cancel_timer();
                if report.high_score_updated {
                    self.high_scores.record(report.high_score).await;
                }
                tracing::info!(
                    score = report.score,
                    total = report.total,
                    percentage = report.percentage,
                    tier = report.tier.as_str(),
                    "quiz session completed"
                );
                self.signals.on_session_completed(&report);
                Ok(ControllerStep::Completed(report))
            }
        }
    }

    fn present(&mut self, presentation: &Presentation) -> ControllerStep {
        self.cancel_timer();
        let limit = self.session.settings().time_limit_secs();
        self.timer = Some(QuestionTimer::start(
            presentation.id,
            limit,
            self.timer_tx.clone(),
        ));
        self.signals.on_question_loaded(presentation);
        ControllerStep::Presented(presentation.id)
    }

    fn cancel_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }
}
