use std::sync::Arc;

use quiz_core::model::{Bookmark, QuestionBank, QuestionIndex, SolvedSet, StarredSet, Theme};

use crate::store::{StateStore, StorageError};

const SOLVED_KEY: &str = "solved_questions";
const STARRED_KEY: &str = "starred_questions";
const BOOKMARK_KEY: &str = "bookmark";
const THEME_KEY: &str = "theme";

/// Typed persistence layer over the raw [`StateStore`].
///
/// Every value is stored as JSON under a fixed key. Absence of a key is the
/// empty/default state; only a present-but-corrupt value is an error.
#[derive(Clone)]
pub struct ProgressRepo {
    store: Arc<dyn StateStore>,
}

impl ProgressRepo {
    #[must_use]
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Load the solved set, dropping indices the bank no longer has.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure or a corrupt stored value.
    pub async fn load_solved(&self, bank: &QuestionBank) -> Result<SolvedSet, StorageError> {
        let indices = self.load_indices(SOLVED_KEY).await?;
        Ok(SolvedSet::from_persisted(indices, bank))
    }

    /// Persist the solved set as an ordered index list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the write fails.
    pub async fn save_solved(&self, solved: &SolvedSet) -> Result<(), StorageError> {
        self.save_json(SOLVED_KEY, &solved.to_vec()).await
    }

    /// Load the starred set, dropping indices the bank no longer has.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure or a corrupt stored value.
    pub async fn load_starred(&self, bank: &QuestionBank) -> Result<StarredSet, StorageError> {
        let indices = self.load_indices(STARRED_KEY).await?;
        Ok(StarredSet::from_persisted(indices, bank))
    }

    /// Persist the starred set as an ordered index list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the write fails.
    pub async fn save_starred(&self, starred: &StarredSet) -> Result<(), StorageError> {
        self.save_json(STARRED_KEY, &starred.to_vec()).await
    }

    /// Load the single bookmark slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure or a corrupt stored value.
    pub async fn load_bookmark(&self) -> Result<Option<Bookmark>, StorageError> {
        let Some(raw) = self.store.get(BOOKMARK_KEY).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Overwrite the single bookmark slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the write fails.
    pub async fn save_bookmark(&self, bookmark: &Bookmark) -> Result<(), StorageError> {
        self.save_json(BOOKMARK_KEY, bookmark).await
    }

    /// Load the theme preference; absent key means the default theme.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failure or an unknown stored theme.
    pub async fn load_theme(&self) -> Result<Theme, StorageError> {
        let Some(raw) = self.store.get(THEME_KEY).await? else {
            return Ok(Theme::default());
        };
        raw.parse()
            .map_err(|e: quiz_core::model::ParseThemeError| {
                StorageError::Serialization(e.to_string())
            })
    }

    /// Persist the theme preference.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the write fails.
    pub async fn save_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.store.set(THEME_KEY, theme.as_str()).await
    }

    /// Remove all persisted progress (solved, starred, bookmark).
    ///
    /// The theme preference survives a reset.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when a delete fails.
    pub async fn clear_progress(&self) -> Result<(), StorageError> {
        self.store.remove(SOLVED_KEY).await?;
        self.store.remove(STARRED_KEY).await?;
        self.store.remove(BOOKMARK_KEY).await?;
        Ok(())
    }

    async fn load_indices(&self, key: &str) -> Result<Vec<QuestionIndex>, StorageError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn save_json<T: serde::Serialize>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(key, &raw).await
    }
}
