use serde::Serialize;

use crate::model::ids::OptionSlot;

/// One option as shown to the player, carrying whether it is the right answer.
///
/// Built fresh for every presentation and discarded once the question is
/// answered or times out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresentedOption {
    pub text: String,
    pub is_correct: bool,
    /// Index of this option in the source question.
    pub source_index: usize,
}

/// Returns the slot holding the correct option, if any.
#[must_use]
pub fn correct_slot(options: &[PresentedOption]) -> Option<OptionSlot> {
    options
        .iter()
        .position(|opt| opt.is_correct)
        .map(OptionSlot::new)
}
