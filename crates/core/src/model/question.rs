use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionIndex;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {index} has no options")]
    NoOptions { index: QuestionIndex },

    #[error("question {index}: correct_answer {correct_answer} is out of range for {options} options")]
    CorrectAnswerOutOfRange {
        index: QuestionIndex,
        correct_answer: usize,
        options: usize,
    },
}

/// A single bank question. Immutable once validated.
///
/// Field names follow the bank document so the type deserializes straight
/// from the wire shape; `validate` must run before a deserialized record
/// enters a bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    index: QuestionIndex,
    section: String,
    question: String,
    options: Vec<String>,
    correct_answer: usize,
    explanation: String,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::NoOptions` for an empty option list and
    /// `QuestionError::CorrectAnswerOutOfRange` when `correct_answer` does
    /// not point into `options`.
    pub fn new(
        index: QuestionIndex,
        section: impl Into<String>,
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let q = Self {
            index,
            section: section.into(),
            question: question.into(),
            options,
            correct_answer,
            explanation: explanation.into(),
        };
        q.validate()?;
        Ok(q)
    }

    /// Check the invariants on a record that arrived via deserialization.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Question::new`].
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.options.is_empty() {
            return Err(QuestionError::NoOptions { index: self.index });
        }
        if self.correct_answer >= self.options.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                index: self.index,
                correct_answer: self.correct_answer,
                options: self.options.len(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn index(&self) -> QuestionIndex {
        self.index
    }

    #[must_use]
    pub fn section(&self) -> &str {
        &self.section
    }

    /// The question prompt shown to the user.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// True when `option` is the correct choice for this question.
    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_answer
    }
}
