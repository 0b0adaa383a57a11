#![forbid(unsafe_code)]

pub mod assets;
pub mod progress_repo;
pub mod sqlite;
pub mod store;

pub use assets::{AssetStore, DirAssetStore, NoAssets};
pub use progress_repo::ProgressRepo;
pub use sqlite::{SqliteInitError, SqliteStore};
pub use store::{InMemoryStore, StateStore, StorageError};
