use thiserror::Error;

use crate::model::{BankError, ExamSummaryError, QuestionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    ExamSummary(#[from] ExamSummaryError),
}
