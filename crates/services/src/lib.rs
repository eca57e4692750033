#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod high_score_service;
pub mod question_source;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use error::{AppServicesError, CatalogError, SessionError};
pub use high_score_service::HighScoreService;

pub use sessions::{
    AnswerResolution, ControllerStep, Presentation, QuizSession, QuizSignals, SessionController,
    SignalRecorder, TimerEvent, TimerSignal,
};
