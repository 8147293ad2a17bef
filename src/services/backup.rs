use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::{
    models::store::Store,
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to serialize backup: {0}")]
    SerializeFailed(#[source] serde_json::Error),

    #[error("Failed to write backup to '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes a pretty-printed copy of everything to
/// `hobby-hop-backup-<date>.json` under `out_dir` and returns the path.
/// Reads the store, never changes it.
pub fn export_data(store: &Store, out_dir: &Path) -> Result<PathBuf, ExportError> {
    let json = serde_json::to_string_pretty(store).map_err(ExportError::SerializeFailed)?;

    let date = jiff::Timestamp::now().strftime("%Y-%m-%d");
    let path = out_dir.join(format!("hobby-hop-backup-{}.json", date));

    fs::write(&path, json).map_err(|e| ExportError::WriteFailed {
        path: path.clone(),
        source: e,
    })?;

    Ok(path)
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Backup is not valid JSON: {0}")]
    ParseFailed(#[source] serde_json::Error),

    #[error("Backup has no '{0}' list")]
    MissingCollection(&'static str),

    #[error("Backup does not match the expected shape: {0}")]
    InvalidShape(#[source] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct ImportSummary {
    pub projects: usize,
    pub materials: usize,
}

/// Replaces everything with the contents of a backup blob. Fails closed:
/// until the whole blob parses and both collections check out as lists,
/// nothing in memory or on disk changes. A failed save rolls the
/// in-memory store back too.
pub fn import_data(
    store: &mut Store,
    storage: &impl Storage,
    json: &str,
) -> Result<ImportSummary, ImportError> {
    let value: Value = serde_json::from_str(json).map_err(ImportError::ParseFailed)?;

    for key in ["projects", "materials"] {
        if !value.get(key).is_some_and(Value::is_array) {
            return Err(ImportError::MissingCollection(key));
        }
    }

    let incoming: Store = serde_json::from_value(value).map_err(ImportError::InvalidShape)?;

    let summary = ImportSummary {
        projects: incoming.projects.len(),
        materials: incoming.materials.len(),
    };

    let previous = std::mem::replace(store, incoming);

    if let Err(e) = storage.save(store) {
        *store = previous;
        return Err(ImportError::Storage(e));
    }

    Ok(summary)
}
