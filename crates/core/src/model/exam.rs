use chrono::{DateTime, Utc};
use thiserror::Error;

/// Number of questions sampled into a mock exam when the bank is large enough.
pub const EXAM_SIZE: usize = 40;

/// Exam duration: 30 minutes.
pub const EXAM_DURATION_SECS: i64 = 1800;

/// Minimum score required to pass.
pub const PASS_MARK: usize = 35;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("score {score} exceeds question count {total}")]
    ScoreExceedsTotal { score: usize, total: usize },
}

/// Final result of a submitted mock exam attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamSummary {
    score: usize,
    total: usize,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl ExamSummary {
    /// Build a summary for a finished attempt.
    ///
    /// # Errors
    ///
    /// Returns `ExamSummaryError::ScoreExceedsTotal` when the score does not
    /// fit the question count, and `ExamSummaryError::InvalidTimeRange` when
    /// the timestamps are out of order.
    pub fn new(
        score: usize,
        total: usize,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, ExamSummaryError> {
        if score > total {
            return Err(ExamSummaryError::ScoreExceedsTotal { score, total });
        }
        if completed_at < started_at {
            return Err(ExamSummaryError::InvalidTimeRange);
        }
        Ok(Self {
            score,
            total,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Pass iff the score reaches [`PASS_MARK`].
    #[must_use]
    pub fn passed(&self) -> bool {
        self.score >= PASS_MARK
    }
}
