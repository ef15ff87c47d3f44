//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::UserError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::sessions::SessionState;

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error(transparent)]
    InvalidInput(#[from] UserError),
    #[error("username already exists")]
    AlreadyExists,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ResultService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResultServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the quiz session runner.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("operation not allowed while session is {0}")]
    InvalidState(SessionState),
    #[error(transparent)]
    Results(#[from] ResultServiceError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
