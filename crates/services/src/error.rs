//! Shared error types for the services crate.

use thiserror::Error;

use storage::StorageError;

/// Errors emitted while bootstrapping the tracker.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TrackerInitError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
