mod progress;
mod service;
mod signals;
mod timer;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{AdvanceOutcome, AnswerResolution, Presentation, QuizSession, SelectOutcome};
pub use signals::{QuizSignals, RecordedSignal, SignalRecorder};
pub use timer::{QuestionTimer, TimerEvent, TimerSignal};
pub use workflow::{ControllerStep, SessionController};
