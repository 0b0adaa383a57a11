use std::sync::Arc;

use quiz_core::model::{Bookmark, Question, QuestionBank, QuestionIndex, SectionFilter, StarredSet};

/// A bookmark mapped back onto the current bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBookmark {
    pub question: QuestionIndex,
    pub filter: SectionFilter,
    /// Position within the filtered list under `filter`.
    pub position: usize,
}

/// Starred questions and the single bookmark slot.
///
/// The starred list is always recomputed from bank + set; the set is the
/// only source of truth.
pub struct StarService {
    bank: Arc<QuestionBank>,
    starred: StarredSet,
    bookmark: Option<Bookmark>,
}

impl StarService {
    #[must_use]
    pub fn new(bank: Arc<QuestionBank>, starred: StarredSet, bookmark: Option<Bookmark>) -> Self {
        Self {
            bank,
            starred,
            bookmark,
        }
    }

    #[must_use]
    pub fn starred(&self) -> &StarredSet {
        &self.starred
    }

    #[must_use]
    pub fn is_starred(&self, index: QuestionIndex) -> bool {
        self.starred.contains(index)
    }

    /// Flip the star on a question. Returns the new state: true when now
    /// starred. Self-inverse.
    pub fn toggle_star(&mut self, index: QuestionIndex) -> bool {
        self.starred.toggle(index)
    }

    /// Bank questions currently starred, in bank order.
    #[must_use]
    pub fn starred_list(&self) -> Vec<&Question> {
        self.bank
            .iter()
            .filter(|q| self.starred.contains(q.index()))
            .collect()
    }

    #[must_use]
    pub fn bookmark(&self) -> Option<&Bookmark> {
        self.bookmark.as_ref()
    }

    /// Overwrite the single bookmark slot.
    pub fn save_bookmark(&mut self, question: QuestionIndex, filter: SectionFilter, position: usize) {
        self.bookmark = Some(Bookmark {
            question,
            filter,
            position,
        });
    }

    /// Map the saved bookmark onto the current bank.
    ///
    /// The saved filter and position are honored when the question still
    /// sits there; a question that moved or left the saved section falls
    /// back to [`SectionFilter::All`]; a question gone from the bank
    /// resolves to nothing.
    #[must_use]
    pub fn resolve_bookmark(&self) -> Option<ResolvedBookmark> {
        let bookmark = self.bookmark.as_ref()?;
        self.bank.get(bookmark.question)?;

        let filtered = self.bank.filtered(&bookmark.filter);
        let under_filter = filtered
            .iter()
            .position(|q| q.index() == bookmark.question);
        if let Some(position) = under_filter {
            return Some(ResolvedBookmark {
                question: bookmark.question,
                filter: bookmark.filter.clone(),
                position,
            });
        }

        // Bank changed since the save: the question is no longer under the
        // saved filter. Locate it in the full list instead.
        let position = self.bank.position_of(bookmark.question)?;
        Some(ResolvedBookmark {
            question: bookmark.question,
            filter: SectionFilter::All,
            position,
        })
    }
}
