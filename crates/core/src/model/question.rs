use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question has no options")]
    NoOptions,

    #[error("question has no correct index")]
    MissingCorrectIndex,

    #[error("correct index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question record, as supplied by a static dataset or JSON file.
///
/// Field names follow the dataset layout (`question`, `options`, `correct`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(rename = "correct")]
    pub correct: Option<usize>,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct: usize,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            options: options.into_iter().map(Into::into).collect(),
            correct: Some(correct),
        }
    }

    /// Validate the draft into an immutable `Question`.
    ///
    /// A single option is accepted and yields a degenerate one-option round.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, there are no options, or
    /// the correct index is missing or does not point at an option.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let prompt = self.prompt.trim().to_owned();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions);
        }

        let len = self.options.len();
        let correct = self.correct.ok_or(QuestionError::MissingCorrectIndex)?;
        if correct >= len {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct,
                len,
            });
        }

        Ok(Question {
            prompt,
            options: self.options,
            correct,
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice question.
///
/// Invariant: `correct < options.len()` and `options` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    correct: usize,
}

impl Question {
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Index into `options()` of the correct answer.
    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct
    }

    /// True when the question cannot be a real choice (fewer than two options).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.options.len() < 2
    }
}
