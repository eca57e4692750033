use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{
    HighScore, OptionSlot, PresentationId, PresentedOption, QuestionBank, QuizSettings,
    ScoreReport, SessionPhase, SessionState, correct_slot,
};
use quiz_core::shuffle::{present_in_order, present_options, shuffled_order};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// A question as it is being shown: prompt plus its options in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub id: PresentationId,
    /// 0-based position of the question within the session order.
    pub index: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<PresentedOption>,
}

/// Visual outcome of a selection.
///
/// `revealed_correct` is only set when the selection was wrong, so the right
/// option can be highlighted next to the wrong one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerResolution {
    pub presentation: PresentationId,
    pub selected: OptionSlot,
    pub is_correct: bool,
    pub revealed_correct: Option<OptionSlot>,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Resolved(AnswerResolution),
    /// The question was already answered (or timed out); nothing changed.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Presented(Presentation),
    Completed(ScoreReport),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz session over a shared question bank.
///
/// Holds every piece of mutable session state and performs the transitions
/// `Idle -> Presenting -> Answered -> Presenting -> ... -> Completed`. It has no
/// timer and does no I/O; `SessionController` layers those on top.
pub struct QuizSession {
    bank: Arc<QuestionBank>,
    settings: QuizSettings,
    clock: Clock,
    rng: StdRng,
    order: Vec<usize>,
    state: SessionState,
    phase: SessionPhase,
    presented: Vec<PresentedOption>,
    active: Option<PresentationId>,
    last_presentation: PresentationId,
    high_score: HighScore,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    report: Option<ScoreReport>,
}

impl QuizSession {
    #[must_use]
    pub fn new(bank: Arc<QuestionBank>, settings: QuizSettings, clock: Clock) -> Self {
        Self::with_rng(bank, settings, clock, StdRng::from_os_rng())
    }

    /// Create a session whose shuffles are reproducible from `seed`.
    #[must_use]
    pub fn with_seed(
        bank: Arc<QuestionBank>,
        settings: QuizSettings,
        clock: Clock,
        seed: u64,
    ) -> Self {
        Self::with_rng(bank, settings, clock, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        bank: Arc<QuestionBank>,
        settings: QuizSettings,
        clock: Clock,
        rng: StdRng,
    ) -> Self {
        let total = bank.len();
        Self {
            bank,
            settings,
            clock,
            rng,
            order: (0..total).collect(),
            state: SessionState::new(total),
            phase: SessionPhase::Idle,
            presented: Vec::new(),
            active: None,
            last_presentation: PresentationId::new(0),
            high_score: HighScore::default(),
            started_at: None,
            completed_at: None,
            report: None,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Options of the question on screen, in display order.
    #[must_use]
    pub fn presented(&self) -> &[PresentedOption] {
        &self.presented
    }

    /// Presentation whose timer may still time it out.
    #[must_use]
    pub fn active_presentation(&self) -> Option<PresentationId> {
        self.active
    }

    #[must_use]
    pub fn high_score(&self) -> HighScore {
        self.high_score
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn report(&self) -> Option<&ScoreReport> {
        self.report.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.state.total_questions();
        let position = (self.state.current_index() + 1).min(total);
        let percent_complete = if total == 0 {
            0
        } else {
            u32::try_from(position * 100 / total).unwrap_or(100)
        };
        SessionProgress {
            position,
            total,
            score: self.state.score(),
            percent_complete,
            is_complete: self.is_complete(),
        }
    }

    /// Begin (or restart) the session from the first question.
    ///
    /// Resets score and position, reshuffles the question order and presents
    /// question 0. An empty bank completes immediately with a 0% report.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` only if the bank changed size under
    /// the session, which cannot happen through the public API.
    pub fn start(&mut self, high_score: HighScore) -> Result<AdvanceOutcome, SessionError> {
        let total = self.bank.len();
        self.state = SessionState::new(total);
        self.order = if self.settings.shuffle_questions() {
            shuffled_order(total, &mut self.rng)
        } else {
            (0..total).collect()
        };
        self.presented.clear();
        self.active = None;
        self.high_score = high_score;
        self.started_at = Some(self.clock.now());
        self.completed_at = None;
        self.report = None;
        self.phase = SessionPhase::Presenting;

        if total == 0 {
            return Ok(AdvanceOutcome::Completed(self.finish()));
        }
        self.load_question(0).map(AdvanceOutcome::Presented)
    }

    /// Present the question at `index` with freshly shuffled options.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `start`, `SessionError::Completed`
    /// after the session finished, and `SessionError::OutOfRange` when `index` is
    /// past the last question; callers must finish the session instead.
    pub fn load_question(&mut self, index: usize) -> Result<Presentation, SessionError> {
        match self.phase {
            SessionPhase::Idle => return Err(SessionError::NotStarted),
            SessionPhase::Completed => return Err(SessionError::Completed),
            SessionPhase::Presenting | SessionPhase::Answered => {}
        }
        let total = self.state.total_questions();
        let bank = Arc::clone(&self.bank);
        let Some(question) = self.order.get(index).and_then(|&idx| bank.get(idx)) else {
            return Err(SessionError::OutOfRange { index, total });
        };

        let prompt = question.prompt().to_owned();
        let options = if self.settings.shuffle_questions() {
            present_options(question, &mut self.rng)
        } else {
            present_in_order(question)
        };

        self.last_presentation = self.last_presentation.next();
        let id = self.last_presentation;
        self.state.focus(index);
        self.phase = SessionPhase::Presenting;
        self.presented.clone_from(&options);
        self.active = Some(id);

        Ok(Presentation {
            id,
            index,
            total,
            prompt,
            options,
        })
    }

    /// Answer the current question with the option in `slot`.
    ///
    /// A second selection for the same question, or one arriving after a
    /// timeout moved the session on, is ignored.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `start` and
    /// `SessionError::InvalidOption` if `slot` is not on screen.
    pub fn select_answer(&mut self, slot: OptionSlot) -> Result<SelectOutcome, SessionError> {
        match self.phase {
            SessionPhase::Idle => return Err(SessionError::NotStarted),
            SessionPhase::Answered | SessionPhase::Completed => return Ok(SelectOutcome::Ignored),
            SessionPhase::Presenting => {}
        }

        let Some(option) = self.presented.get(slot.index()) else {
            return Err(SessionError::InvalidOption {
                slot: slot.index(),
                len: self.presented.len(),
            });
        };
        let is_correct = option.is_correct;

        if !self.state.record_answer(is_correct) {
            return Ok(SelectOutcome::Ignored);
        }
        self.phase = SessionPhase::Answered;
        let presentation = self.active.take().unwrap_or(self.last_presentation);

        let revealed_correct = if is_correct {
            None
        } else {
            correct_slot(&self.presented)
        };

        Ok(SelectOutcome::Resolved(AnswerResolution {
            presentation,
            selected: slot,
            is_correct,
            revealed_correct,
            score: self.state.score(),
        }))
    }

    /// Handle the timer expiring for `presentation`.
    ///
    /// Only the active, unanswered presentation can time out. The question
    /// counts as unanswered: nothing is marked and the session moves on exactly
    /// as `advance` would. Returns `None` for stale or late expiries.
    ///
    /// # Errors
    ///
    /// Propagates `advance` errors.
    pub fn timeout(
        &mut self,
        presentation: PresentationId,
    ) -> Result<Option<AdvanceOutcome>, SessionError> {
        if self.phase != SessionPhase::Presenting
            || self.state.answered()
            || self.active != Some(presentation)
        {
            return Ok(None);
        }
        self.advance().map(Some)
    }

    /// Move past the current question, finishing the session after the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `start` and
    /// `SessionError::Completed` once the session is over.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        match self.phase {
            SessionPhase::Idle => return Err(SessionError::NotStarted),
            SessionPhase::Completed => return Err(SessionError::Completed),
            SessionPhase::Presenting | SessionPhase::Answered => {}
        }

        self.state.advance();
        self.presented.clear();
        self.active = None;

        if self.state.is_exhausted() {
            return Ok(AdvanceOutcome::Completed(self.finish()));
        }
        self.load_question(self.state.current_index())
            .map(AdvanceOutcome::Presented)
    }

    fn finish(&mut self) -> ScoreReport {
        let total = u32::try_from(self.state.total_questions()).unwrap_or(u32::MAX);
        let report = ScoreReport::compute(self.state.score(), total, self.high_score);
        self.phase = SessionPhase::Completed;
        self.completed_at = Some(self.clock.now());
        self.high_score = report.high_score;
        self.report = Some(report);
        report
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("bank_len", &self.bank.len())
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("active", &self.active)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
