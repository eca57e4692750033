use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one presentation of a question within a controller's lifetime.
///
/// Every timer signal carries the id of the presentation it was started for,
/// so signals from a superseded presentation can be recognised and dropped.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PresentationId(u64);

impl PresentationId {
    /// Creates a new `PresentationId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Returns the id that follows this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Position of an option within a single presentation (0-based).
///
/// Slots are only meaningful for the presentation that produced them; the
/// same question shown again gets a fresh permutation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OptionSlot(usize);

impl OptionSlot {
    /// Creates a new `OptionSlot`
    #[must_use]
    pub fn new(slot: usize) -> Self {
        Self(slot)
    }

    /// Returns the underlying index
    #[must_use]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Debug for PresentationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PresentationId({})", self.0)
    }
}

impl fmt::Debug for OptionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionSlot({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for PresentationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Slots display 1-based, the way they are numbered on screen.
impl fmt::Display for OptionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 + 1)
    }
}
