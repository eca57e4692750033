use serde::Serialize;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    /// 1-based number of the question on screen.
    pub position: usize,
    pub total: usize,
    pub score: u32,
    /// Share of the quiz reached, counting the current question.
    pub percent_complete: u32,
    pub is_complete: bool,
}
