use serde::Serialize;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    /// Created but not started yet.
    Idle,
    /// A question is on screen and the timer is running.
    Presenting,
    /// The current question has been answered; waiting for the player to move on.
    Answered,
    /// Every question has been shown and the score is final.
    Completed,
}

/// Mutable progress of one quiz session.
///
/// Invariants: `current_index <= total_questions`, `score <= total_questions`,
/// and `score` only ever grows by one per correct selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionState {
    current_index: usize,
    score: u32,
    answered: bool,
    total_questions: usize,
}

impl SessionState {
    #[must_use]
    pub fn new(total_questions: usize) -> Self {
        Self {
            current_index: 0,
            score: 0,
            answered: false,
            total_questions,
        }
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn answered(&self) -> bool {
        self.answered
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    /// True once `current_index` has moved past the last question.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.current_index >= self.total_questions
    }

    /// Mark the current question as answered, crediting a point when correct.
    ///
    /// Returns `false` without touching anything if the question was already
    /// answered.
    pub fn record_answer(&mut self, correct: bool) -> bool {
        if self.answered {
            return false;
        }
        self.answered = true;
        if correct {
            self.score = self.score.saturating_add(1);
        }
        true
    }

    /// Move to the next question and clear the answered flag.
    ///
    /// Saturates at `total_questions`.
    pub fn advance(&mut self) {
        self.current_index = (self.current_index + 1).min(self.total_questions);
        self.answered = false;
    }

    /// Point the state at `index` with a fresh, unanswered question.
    pub fn focus(&mut self, index: usize) {
        self.current_index = index.min(self.total_questions);
        self.answered = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_answer_is_ignored() {
        let mut state = SessionState::new(3);
        assert!(state.record_answer(true));
        assert!(!state.record_answer(true));
        assert_eq!(state.score(), 1);
        assert!(state.answered());
    }

    #[test]
    fn advance_resets_answered_and_saturates() {
        let mut state = SessionState::new(1);
        state.record_answer(false);
        state.advance();
        assert!(!state.answered());
        assert!(state.is_exhausted());
        state.advance();
        assert_eq!(state.current_index(), 1);
        assert_eq!(state.score(), 0);
    }
}
