use thiserror::Error;

use crate::{
    models::store::Store,
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum CompleteTutorialError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Marks the tutorial as seen. Returns whether the flag actually flipped;
/// a repeat call changes nothing and writes nothing.
pub fn complete_tutorial(
    store: &mut Store,
    storage: &impl Storage,
) -> Result<bool, CompleteTutorialError> {
    if !store.complete_tutorial() {
        return Ok(false);
    }

    storage.save(store)?;

    Ok(true)
}
