use std::path::PathBuf;

use quiz_core::model::QuestionIndex;

/// Lookup for optional per-question illustration assets.
///
/// Absence is never an error; a question without an image simply renders
/// without one, so the probe is infallible by contract.
pub trait AssetStore: Send + Sync {
    /// True when an asset exists for the question.
    fn exists(&self, index: QuestionIndex) -> bool;

    /// Path-like locator for the asset, when one exists.
    fn locate(&self, index: QuestionIndex) -> Option<PathBuf>;
}

/// Probes a directory for `<index>.<ext>` files.
pub struct DirAssetStore {
    dir: PathBuf,
    extensions: Vec<&'static str>,
}

impl DirAssetStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extensions: vec!["png", "jpg", "jpeg", "webp"],
        }
    }
}

impl AssetStore for DirAssetStore {
    fn exists(&self, index: QuestionIndex) -> bool {
        self.locate(index).is_some()
    }

    fn locate(&self, index: QuestionIndex) -> Option<PathBuf> {
        self.extensions
            .iter()
            .map(|ext| self.dir.join(format!("{index}.{ext}")))
            .find(|candidate| candidate.is_file())
    }
}

/// Null object for setups without question images.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetStore for NoAssets {
    fn exists(&self, _index: QuestionIndex) -> bool {
        false
    }

    fn locate(&self, _index: QuestionIndex) -> Option<PathBuf> {
        None
    }
}
