//! Error types for the rider directory.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during rider operations.
#[derive(Debug, Error)]
pub enum RiderError {
    /// The service was constructed without a store backend.
    #[error("backend not configured")]
    BackendUnavailable,

    /// The requested rider does not exist.
    #[error("rider not found: {0}")]
    NotFound(String),

    /// A stored rider document did not decode into a [`crate::model::Rider`].
    #[error("rider record malformed: {0}")]
    Decode(#[from] serde_json::Error),

    /// An underlying store failure.
    #[error("store error: {0}")]
    Store(StoreError),
}

impl RiderError {
    pub(crate) fn store(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}
