use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSettingsError {
    #[error("time limit must be between 1 and {max} seconds, got {got}")]
    InvalidTimeLimit { got: u32, max: u32 },
}

/// Per-session tuning for the quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    time_limit_secs: u32,
    shuffle_questions: bool,
}

impl QuizSettings {
    pub const DEFAULT_TIME_LIMIT_SECS: u32 = 30;
    pub const MAX_TIME_LIMIT_SECS: u32 = 3_600;

    /// Creates custom quiz settings.
    ///
    /// # Errors
    ///
    /// Returns `QuizSettingsError::InvalidTimeLimit` if the limit is zero or
    /// longer than an hour.
    pub fn new(time_limit_secs: u32, shuffle_questions: bool) -> Result<Self, QuizSettingsError> {
        if time_limit_secs == 0 || time_limit_secs > Self::MAX_TIME_LIMIT_SECS {
            return Err(QuizSettingsError::InvalidTimeLimit {
                got: time_limit_secs,
                max: Self::MAX_TIME_LIMIT_SECS,
            });
        }
        Ok(Self {
            time_limit_secs,
            shuffle_questions,
        })
    }

    /// Seconds a player gets for each question.
    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    /// Whether the bank order (and option order) is shuffled per session.
    #[must_use]
    pub fn shuffle_questions(&self) -> bool {
        self.shuffle_questions
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            time_limit_secs: Self::DEFAULT_TIME_LIMIT_SECS,
            shuffle_questions: true,
        }
    }
}
