use serde::Serialize;
use std::fmt;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreError {
    #[error("cannot compute a percentage for an empty question bank")]
    EmptyBank,
}

//
// ─── HIGH SCORE ────────────────────────────────────────────────────────────────
//

/// Best score ever achieved, as kept by the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub struct HighScore(u32);

impl HighScore {
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for HighScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a persisted high score. Missing, negative or non-numeric values read as 0.
#[must_use]
pub fn parse_high_score(raw: Option<&str>) -> HighScore {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .map(HighScore::new)
        .unwrap_or_default()
}

//
// ─── FEEDBACK TIER ─────────────────────────────────────────────────────────────
//

/// Result bucket derived from the final percentage.
///
/// Bounds are inclusive lower bounds checked from the top:
/// - `Mastery`: 90 and above
/// - `Great`: 70 and above
/// - `Okay`: 50 and above
/// - `Practice`: everything else
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeedbackTier {
    Mastery,
    Great,
    Okay,
    Practice,
}

impl FeedbackTier {
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Self::Mastery,
            70..=89 => Self::Great,
            50..=69 => Self::Okay,
            _ => Self::Practice,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mastery => "mastery",
            Self::Great => "great",
            Self::Okay => "okay",
            Self::Practice => "practice",
        }
    }

    /// Line shown to the player on the result screen.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Mastery => "Perfect! You're a JavaScript master!",
            Self::Great => "Great work! Keep learning.",
            Self::Okay => "Not bad! Review a few topics.",
            Self::Practice => "Keep practicing, you'll get there!",
        }
    }
}

impl fmt::Display for FeedbackTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── PERCENTAGE ────────────────────────────────────────────────────────────────
//

/// Integer percentage of `score` out of `total`, rounding halves up.
///
/// # Errors
///
/// Returns `ScoreError::EmptyBank` when `total` is zero.
pub fn checked_percentage(score: u32, total: u32) -> Result<u32, ScoreError> {
    if total == 0 {
        return Err(ScoreError::EmptyBank);
    }
    let score = u64::from(score);
    let total = u64::from(total);
    let rounded = (200 * score + total) / (2 * total);
    Ok(u32::try_from(rounded).unwrap_or(u32::MAX))
}

/// Like `checked_percentage`, but an empty bank reports 0%.
#[must_use]
pub fn percentage(score: u32, total: u32) -> u32 {
    checked_percentage(score, total).unwrap_or(0)
}

//
// ─── REPORT ────────────────────────────────────────────────────────────────────
//

/// Final outcome of a session, including the high score comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    pub score: u32,
    pub total: u32,
    pub percentage: u32,
    pub tier: FeedbackTier,
    /// High score after this session (the new score when it was beaten).
    pub high_score: HighScore,
    /// True only when `score` strictly beat the previous high score.
    pub high_score_updated: bool,
}

impl ScoreReport {
    /// Score a finished session against the previous high score.
    #[must_use]
    pub fn compute(score: u32, total: u32, previous_high: HighScore) -> Self {
        let percentage = percentage(score, total);
        let high_score_updated = score > previous_high.value();
        let high_score = if high_score_updated {
            HighScore::new(score)
        } else {
            previous_high
        };

        Self {
            score,
            total,
            percentage,
            tier: FeedbackTier::from_percentage(percentage),
            high_score,
            high_score_updated,
        }
    }
}
