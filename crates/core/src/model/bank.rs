use crate::model::question::{Question, QuestionDraft, QuestionError};

/// A draft that failed validation, with its position in the source list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedQuestion {
    pub position: usize,
    pub error: QuestionError,
}

/// The immutable, ordered set of questions a session draws from.
///
/// Sessions never reorder the bank itself; they shuffle an index order over it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Validate raw drafts, keeping the good ones and reporting the rest.
    #[must_use]
    pub fn from_drafts(
        drafts: impl IntoIterator<Item = QuestionDraft>,
    ) -> (Self, Vec<MalformedQuestion>) {
        let mut questions = Vec::new();
        let mut malformed = Vec::new();

        for (position, draft) in drafts.into_iter().enumerate() {
            match draft.validate() {
                Ok(question) => questions.push(question),
                Err(error) => malformed.push(MalformedQuestion { position, error }),
            }
        }

        (Self { questions }, malformed)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}
