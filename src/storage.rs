use std::path::PathBuf;

use thiserror::Error;

use crate::models::store::Store;

pub mod json;
pub mod migrations;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to load store from '{path}': {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save store to '{path}': {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize store to JSON: {source}")]
    SerializeFailed {
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to create backup at '{path}': {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to cleanup old backups in '{dir}': {source}")]
    CleanupFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a load produced, and whether it came from the legacy record. A
/// migrated store has not been written anywhere yet: `load` never writes,
/// the caller decides when to save it back.
pub struct LoadOutcome {
    pub store: Store,
    pub migrated: bool,
}

pub trait Storage {
    fn load(&self) -> Result<LoadOutcome, StorageError>;
    fn save(&self, store: &Store) -> Result<(), StorageError>;
}
