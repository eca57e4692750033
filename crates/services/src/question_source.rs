//! Loading question banks from the built-in catalog or a JSON file.

use std::path::Path;

use quiz_core::catalog::builtin_questions;
use quiz_core::model::{MalformedQuestion, QuestionBank, QuestionDraft};

use crate::error::CatalogError;

/// The built-in question bank.
#[must_use]
pub fn builtin_bank() -> QuestionBank {
    bank_from_drafts(builtin_questions())
}

/// Validate drafts into a bank, logging and skipping malformed questions.
#[must_use]
pub fn bank_from_drafts(drafts: Vec<QuestionDraft>) -> QuestionBank {
    let (bank, malformed) = QuestionBank::from_drafts(drafts);
    for MalformedQuestion { position, error } in &malformed {
        tracing::warn!(position, %error, "skipping malformed question");
    }
    for question in bank.iter().filter(|q| q.is_degenerate()) {
        tracing::info!(prompt = question.prompt(), "question offers a single option");
    }
    bank
}

/// Parse a JSON array of questions.
///
/// # Errors
///
/// Returns `CatalogError::Parse` for invalid JSON and `CatalogError::Empty`
/// if no question survives validation.
pub fn bank_from_json(raw: &str) -> Result<QuestionBank, CatalogError> {
    let drafts: Vec<QuestionDraft> = serde_json::from_str(raw)?;
    let bank = bank_from_drafts(drafts);
    if bank.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(bank)
}

/// Read and parse a JSON question file.
///
/// # Errors
///
/// Returns `CatalogError` if the file cannot be read or parsed, or holds no
/// valid questions.
pub fn load_bank(path: impl AsRef<Path>) -> Result<QuestionBank, CatalogError> {
    let raw = std::fs::read_to_string(path)?;
    bank_from_json(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_bank_has_ten_questions() {
        assert_eq!(builtin_bank().len(), 10);
    }

    #[test]
    fn json_bank_skips_bad_entries() {
        let raw = r#"[
            {"question": "Good?", "options": ["yes", "no"], "correct": 0},
            {"question": "No answer key", "options": ["a", "b"]},
            {"question": "Out of range", "options": ["a", "b"], "correct": 4}
        ]"#;
        let bank = bank_from_json(raw).unwrap();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.get(0).unwrap().prompt(), "Good?");
    }

    #[test]
    fn single_option_question_is_kept() {
        let raw = r#"[
            {"question": "Only one way", "options": ["this"], "correct": 0},
            {"question": "Two ways", "options": ["a", "b"], "correct": 1}
        ]"#;
        let bank = bank_from_json(raw).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.iter().filter(|q| q.is_degenerate()).count(), 1);
    }

    #[test]
    fn json_bank_without_valid_questions_is_empty_error() {
        let raw = r#"[{"question": "", "options": ["a"], "correct": 0}]"#;
        assert!(matches!(bank_from_json(raw), Err(CatalogError::Empty)));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(bank_from_json("{"), Err(CatalogError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_bank("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
