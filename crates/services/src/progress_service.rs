use tracing::warn;

use quiz_core::model::{Bookmark, QuestionBank, SolvedSet, StarredSet, Theme};
use storage::progress_repo::ProgressRepo;

/// Best-effort persistence around [`ProgressRepo`].
///
/// Loads fall back to defaults and saves are fire-and-forget: a storage
/// failure is logged and swallowed, never surfaced to the caller. The one
/// fatal boundary in the system is the bank load, not progress state.
#[derive(Clone)]
pub struct ProgressService {
    repo: ProgressRepo,
}

impl ProgressService {
    #[must_use]
    pub fn new(repo: ProgressRepo) -> Self {
        Self { repo }
    }

    /// Load the solved set; a missing or unreadable value is an empty set.
    pub async fn load_solved(&self, bank: &QuestionBank) -> SolvedSet {
        match self.repo.load_solved(bank).await {
            Ok(solved) => solved,
            Err(err) => {
                warn!(%err, "failed to load solved set, starting empty");
                SolvedSet::new()
            }
        }
    }

    /// Persist the solved set, best-effort.
    pub async fn save_solved(&self, solved: &SolvedSet) {
        if let Err(err) = self.repo.save_solved(solved).await {
            warn!(%err, "failed to persist solved set");
        }
    }

    /// Load the starred set; a missing or unreadable value is an empty set.
    pub async fn load_starred(&self, bank: &QuestionBank) -> StarredSet {
        match self.repo.load_starred(bank).await {
            Ok(starred) => starred,
            Err(err) => {
                warn!(%err, "failed to load starred set, starting empty");
                StarredSet::new()
            }
        }
    }

    /// Persist the starred set, best-effort.
    pub async fn save_starred(&self, starred: &StarredSet) {
        if let Err(err) = self.repo.save_starred(starred).await {
            warn!(%err, "failed to persist starred set");
        }
    }

    /// Load the bookmark slot; a missing or unreadable value is no bookmark.
    pub async fn load_bookmark(&self) -> Option<Bookmark> {
        match self.repo.load_bookmark().await {
            Ok(bookmark) => bookmark,
            Err(err) => {
                warn!(%err, "failed to load bookmark");
                None
            }
        }
    }

    /// Persist the bookmark slot, best-effort.
    pub async fn save_bookmark(&self, bookmark: &Bookmark) {
        if let Err(err) = self.repo.save_bookmark(bookmark).await {
            warn!(%err, "failed to persist bookmark");
        }
    }

    /// Load the theme preference; anything unreadable is the default.
    pub async fn load_theme(&self) -> Theme {
        match self.repo.load_theme().await {
            Ok(theme) => theme,
            Err(err) => {
                warn!(%err, "failed to load theme, using default");
                Theme::default()
            }
        }
    }

    /// Persist the theme preference, best-effort.
    pub async fn save_theme(&self, theme: Theme) {
        if let Err(err) = self.repo.save_theme(theme).await {
            warn!(%err, "failed to persist theme");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::model::{Question, QuestionIndex};
    use std::sync::Arc;
    use storage::store::{InMemoryStore, StateStore, StorageError};

    fn bank() -> QuestionBank {
        let questions = (1..=3)
            .map(|i| {
                Question::new(
                    QuestionIndex::new(i),
                    "A",
                    format!("Q{i}"),
                    vec!["a".into(), "b".into()],
                    0,
                    "",
                )
                .unwrap()
            })
            .collect();
        QuestionBank::new(questions).unwrap()
    }

    /// Store whose every operation fails, for the best-effort paths.
    struct BrokenStore;

    #[async_trait]
    impl StateStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Connection("broken".into()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("broken".into()))
        }

        async fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Connection("broken".into()))
        }
    }

    #[tokio::test]
    async fn broken_store_falls_back_to_defaults() {
        let service = ProgressService::new(ProgressRepo::new(Arc::new(BrokenStore)));
        let bank = bank();

        assert!(service.load_solved(&bank).await.is_empty());
        assert!(service.load_starred(&bank).await.is_empty());
        assert!(service.load_bookmark().await.is_none());
        assert_eq!(service.load_theme().await, Theme::Light);
    }

    #[tokio::test]
    async fn broken_store_saves_do_not_fail() {
        let service = ProgressService::new(ProgressRepo::new(Arc::new(BrokenStore)));
        let mut solved = SolvedSet::new();
        solved.insert(QuestionIndex::new(1));

        // Nothing to assert beyond "does not panic or propagate".
        service.save_solved(&solved).await;
        service.save_theme(Theme::Dark).await;
    }

    #[tokio::test]
    async fn working_store_round_trips() {
        let service = ProgressService::new(ProgressRepo::new(Arc::new(InMemoryStore::new())));
        let bank = bank();

        let mut solved = SolvedSet::new();
        solved.insert(QuestionIndex::new(2));
        service.save_solved(&solved).await;
        assert_eq!(service.load_solved(&bank).await, solved);

        service.save_theme(Theme::Dark).await;
        assert_eq!(service.load_theme().await, Theme::Dark);
    }
}
