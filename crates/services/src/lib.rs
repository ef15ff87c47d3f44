#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod error;
pub mod result_service;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use auth_service::{AuthService, AuthenticatedUser};
pub use error::{AppServicesError, AuthError, ResultServiceError, SessionError};
pub use result_service::{RECENT_RESULTS_LIMIT, ResultEntry, ResultService, Statistics};

pub use sessions::{
    AnswerOutcome, QuizSession, SessionAnswerResult, SessionLoopService, SessionProgress,
    SessionState,
};
