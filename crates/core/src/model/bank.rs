use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionIndex;
use crate::model::question::{Question, QuestionError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("bank contains no questions")]
    Empty,

    #[error("duplicate question index {0}")]
    DuplicateIndex(QuestionIndex),

    #[error(transparent)]
    Question(#[from] QuestionError),
}

//
// ─── SECTION FILTER ────────────────────────────────────────────────────────────
//

/// Working-list restriction for practice navigation.
///
/// Serialized inside the bookmark, so the wire shape stays stable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "section")]
pub enum SectionFilter {
    #[default]
    All,
    Section(String),
}

impl SectionFilter {
    /// True when `question` belongs to the working list under this filter.
    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        match self {
            SectionFilter::All => true,
            SectionFilter::Section(name) => question.section() == name,
        }
    }
}

impl fmt::Display for SectionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionFilter::All => write!(f, "all"),
            SectionFilter::Section(name) => write!(f, "{name}"),
        }
    }
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// The full, immutable set of questions loaded once at startup.
///
/// Bank order is document order; every lookup structure is derived from it
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
    by_index: HashMap<QuestionIndex, usize>,
}

impl QuestionBank {
    /// Build a bank from validated questions.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Empty` for an empty list,
    /// `BankError::DuplicateIndex` when two questions share an index, and
    /// `BankError::Question` when a record fails validation.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        let mut by_index = HashMap::with_capacity(questions.len());
        for (pos, q) in questions.iter().enumerate() {
            q.validate()?;
            if by_index.insert(q.index(), pos).is_some() {
                return Err(BankError::DuplicateIndex(q.index()));
            }
        }

        Ok(Self {
            questions,
            by_index,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    /// Look up a question by its stable index.
    #[must_use]
    pub fn get(&self, index: QuestionIndex) -> Option<&Question> {
        self.by_index.get(&index).map(|&pos| &self.questions[pos])
    }

    /// Position of a question within the full bank, in bank order.
    #[must_use]
    pub fn position_of(&self, index: QuestionIndex) -> Option<usize> {
        self.by_index.get(&index).copied()
    }

    #[must_use]
    pub fn contains(&self, index: QuestionIndex) -> bool {
        self.by_index.contains_key(&index)
    }

    /// Distinct section names in first-appearance order.
    #[must_use]
    pub fn sections(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for q in &self.questions {
            if !seen.contains(&q.section()) {
                seen.push(q.section());
            }
        }
        seen
    }

    /// The working list under `filter`, in bank order.
    #[must_use]
    pub fn filtered(&self, filter: &SectionFilter) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| filter.matches(q))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(index: u32, section: &str) -> Question {
        Question::new(
            QuestionIndex::new(index),
            section,
            format!("Question {index}?"),
            vec!["a".into(), "b".into(), "c".into()],
            0,
            "because",
        )
        .unwrap()
    }

    fn bank() -> QuestionBank {
        QuestionBank::new(vec![
            question(1, "Signs"),
            question(2, "Rules"),
            question(3, "Signs"),
        ])
        .unwrap()
    }

    #[test]
    fn empty_bank_is_rejected() {
        assert!(matches!(
            QuestionBank::new(Vec::new()).unwrap_err(),
            BankError::Empty
        ));
    }

    #[test]
    fn duplicate_index_is_rejected() {
        let err = QuestionBank::new(vec![question(1, "Signs"), question(1, "Rules")]).unwrap_err();
        assert_eq!(err, BankError::DuplicateIndex(QuestionIndex::new(1)));
    }

    #[test]
    fn sections_keep_first_appearance_order() {
        assert_eq!(bank().sections(), vec!["Signs", "Rules"]);
    }

    #[test]
    fn filter_narrows_to_one_section() {
        let bank = bank();
        let signs = bank.filtered(&SectionFilter::Section("Signs".into()));
        assert_eq!(signs.len(), 2);
        assert!(signs.iter().all(|q| q.section() == "Signs"));

        let all = bank.filtered(&SectionFilter::All);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn position_of_uses_bank_order() {
        let bank = bank();
        assert_eq!(bank.position_of(QuestionIndex::new(3)), Some(2));
        assert_eq!(bank.position_of(QuestionIndex::new(9)), None);
    }
}
