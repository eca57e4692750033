//! Built-in question set used when no external bank is supplied.

use crate::model::QuestionDraft;

/// The default web-development quiz.
#[must_use]
pub fn builtin_questions() -> Vec<QuestionDraft> {
    vec![
        QuestionDraft::new(
            "What does 'let' declare in JavaScript?",
            ["A constant value", "A changeable variable", "A function", "An array"],
            1,
        ),
        QuestionDraft::new(
            "Which is the strict equality operator?",
            ["==", "=", "===", "!="],
            2,
        ),
        QuestionDraft::new(
            "What is the purpose of a for loop?",
            [
                "To declare variables",
                "To repeat code a set number of times",
                "To handle events",
                "To style elements",
            ],
            1,
        ),
        QuestionDraft::new(
            "How do you select an element by ID in the DOM?",
            ["querySelector", "getElementById", "createElement", "appendChild"],
            1,
        ),
        QuestionDraft::new(
            "Which keyword prevents variable reassignment?",
            ["let", "const", "var", "static"],
            1,
        ),
        QuestionDraft::new(
            "What does DOM stand for?",
            [
                "Document Object Model",
                "Display Object Manager",
                "Digital Operation Mode",
                "Data Output Method",
            ],
            0,
        ),
        QuestionDraft::new(
            "How do you select an element with the ID 'header' in CSS?",
            [".header", "#header", "header", "id.header"],
            1,
        ),
        QuestionDraft::new(
            "Which CSS property controls the text size?",
            ["font-size", "text-style", "font-weight", "text-size"],
            0,
        ),
        QuestionDraft::new(
            "What does HTML stand for?",
            [
                "Hyperlinks and Text Markup Language",
                "Hyper Text Markup Language",
                "Home Tool Markup Language",
                "Hyper Tag Markdown Language",
            ],
            1,
        ),
        QuestionDraft::new(
            "Which tag is used to create a hyperlink in HTML?",
            ["<a>", "<link>", "<href>", "<url>"],
            0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionBank;

    #[test]
    fn builtin_catalog_is_fully_valid() {
        let (bank, malformed) = QuestionBank::from_drafts(builtin_questions());
        assert!(malformed.is_empty());
        assert_eq!(bank.len(), 10);
        assert!(bank.iter().all(|q| q.options().len() == 4));
    }
}
