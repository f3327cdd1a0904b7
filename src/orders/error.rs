//! Error types for the order lifecycle service.

use thiserror::Error;

use crate::model::OrderStatus;
use crate::store::StoreError;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The service was constructed without a store backend.
    #[error("backend not configured")]
    BackendUnavailable,

    /// The requested order does not exist.
    #[error("order not found: {0}")]
    NotFound(String),

    /// The order payload is unusable.
    #[error("invalid order: {0}")]
    Validation(String),

    /// The requested status change is not on the transition graph.
    #[error("illegal status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// `dispatched` is only reachable through rider assignment.
    #[error("dispatch requires a rider assignment")]
    RiderRequired,

    /// A stored order document did not decode into an [`crate::model::Order`].
    #[error("order record malformed: {0}")]
    Decode(#[from] serde_json::Error),

    /// An underlying store failure.
    #[error("store error: {0}")]
    Store(StoreError),
}

impl OrderError {
    /// Maps store-level errors, promoting `NotFound` to the domain variant.
    pub(crate) fn store(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}
