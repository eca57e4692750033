mod bank;
mod ids;
mod presented;
mod question;
mod score;
mod session;
mod settings;

pub use bank::{MalformedQuestion, QuestionBank};
pub use ids::{OptionSlot, PresentationId};
pub use presented::{PresentedOption, correct_slot};
pub use question::{Question, QuestionDraft, QuestionError};
pub use score::{
    FeedbackTier, HighScore, ScoreError, ScoreReport, checked_percentage, parse_high_score,
    percentage,
};
pub use session::{SessionPhase, SessionState};
pub use settings::{QuizSettings, QuizSettingsError};
