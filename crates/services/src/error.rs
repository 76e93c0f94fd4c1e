//! Shared error types for the services crate.

use thiserror::Error;

use bda_core::model::{AttemptError, ExamError, ExamId};
use bda_core::session::SessionError;
use storage::repository::{AttemptId, StorageError};
use storage::sqlite::SqliteInitError;

/// Errors emitted while starting, finishing or persisting an exam run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamServiceError {
    #[error("exam {0} not found")]
    NotFound(ExamId),
    #[error("exam {0} is not active")]
    Inactive(ExamId),
    #[error("exam run has not finished")]
    NotFinished,
    #[error("exam run was submitted, not expired")]
    NotExpired,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Exam(#[from] ExamError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AttemptHistoryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HistoryError {
    #[error("attempt {0} not found")]
    AttemptNotFound(AttemptId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Core(#[from] bda_core::Error),
}
