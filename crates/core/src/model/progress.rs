use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::model::bank::{QuestionBank, SectionFilter};
use crate::model::ids::QuestionIndex;

//
// ─── SOLVED SET ────────────────────────────────────────────────────────────────
//

/// Question indices the user has answered correctly at least once.
///
/// Grow-only; nothing ever removes an entry once a question was solved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolvedSet {
    indices: BTreeSet<QuestionIndex>,
}

impl SolvedSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from persisted indices, dropping any the bank no longer has.
    #[must_use]
    pub fn from_persisted(indices: Vec<QuestionIndex>, bank: &QuestionBank) -> Self {
        Self {
            indices: indices
                .into_iter()
                .filter(|idx| bank.contains(*idx))
                .collect(),
        }
    }

    /// Record a correct answer. Returns true when the index was new.
    pub fn insert(&mut self, index: QuestionIndex) -> bool {
        self.indices.insert(index)
    }

    #[must_use]
    pub fn contains(&self, index: QuestionIndex) -> bool {
        self.indices.contains(&index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Ordered snapshot for persistence.
    #[must_use]
    pub fn to_vec(&self) -> Vec<QuestionIndex> {
        self.indices.iter().copied().collect()
    }
}

//
// ─── STARRED SET ───────────────────────────────────────────────────────────────
//

/// Question indices the user has flagged. Toggleable, unlike [`SolvedSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StarredSet {
    indices: BTreeSet<QuestionIndex>,
}

impl StarredSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from persisted indices, dropping any the bank no longer has.
    #[must_use]
    pub fn from_persisted(indices: Vec<QuestionIndex>, bank: &QuestionBank) -> Self {
        Self {
            indices: indices
                .into_iter()
                .filter(|idx| bank.contains(*idx))
                .collect(),
        }
    }

    /// Flip membership. Returns the new state: true when now starred.
    pub fn toggle(&mut self, index: QuestionIndex) -> bool {
        if self.indices.remove(&index) {
            false
        } else {
            self.indices.insert(index);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, index: QuestionIndex) -> bool {
        self.indices.contains(&index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Ordered snapshot for persistence.
    #[must_use]
    pub fn to_vec(&self) -> Vec<QuestionIndex> {
        self.indices.iter().copied().collect()
    }
}

//
// ─── BOOKMARK ──────────────────────────────────────────────────────────────────
//

/// Single saved resume point. One slot, overwritten on every save.
///
/// May go stale if the bank changes between loads; resolution handles that,
/// the stored value itself is not revalidated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub question: QuestionIndex,
    pub filter: SectionFilter,
    pub position: usize,
}

//
// ─── THEME ─────────────────────────────────────────────────────────────────────
//

/// Display theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for parsing a theme from its persisted string form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThemeError(pub String);

impl fmt::Display for ParseThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme: {}", self.0)
    }
}

impl std::error::Error for ParseThemeError {}

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}
