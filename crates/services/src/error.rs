//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{BankError, ExamSummaryError, QuestionIndex};
use storage::sqlite::SqliteInitError;
use storage::store::StorageError;

/// Errors emitted while loading the question bank.
///
/// Every variant is fatal to the session: the bank loads once at startup and
/// there is no retry path.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankLoadError {
    #[error("bank fetch failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("bank file could not be read: {0}")]
    Io(#[from] std::io::Error),
    #[error("bank document could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Bank(#[from] BankError),
}

/// Errors emitted by the practice session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PracticeError {
    /// Jump target does not exist in the bank. Recoverable; session state
    /// is left unchanged.
    #[error("question {0} not found")]
    NotFound(QuestionIndex),

    #[error("no question under the current filter")]
    NoQuestion,

    #[error("current question was already answered")]
    AlreadyAnswered,

    #[error("option {option} is out of range for {options} options")]
    InvalidOption { option: usize, options: usize },
}

/// Errors emitted by the mock exam.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    #[error("cannot start an exam from an empty bank")]
    EmptyBank,

    #[error("an exam attempt is already in progress")]
    AlreadyRunning,

    #[error("no exam attempt is in progress")]
    NotRunning,

    #[error("position {position} is out of range for {total} questions")]
    OutOfBounds { position: usize, total: usize },

    #[error("option {option} is out of range for {options} options")]
    InvalidOption { option: usize, options: usize },

    #[error(transparent)]
    Summary(#[from] ExamSummaryError),
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
    BankLoad(#[from] BankLoadError),
}
