//! Error types for the access control gate.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur managing the authorization list.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The service was constructed without a store backend.
    #[error("backend not configured")]
    BackendUnavailable,

    /// An empty email cannot be authorized or revoked.
    #[error("email is empty")]
    EmptyEmail,

    /// The email is already on the authorization list.
    #[error("rider email already authorized: {0}")]
    AlreadyAuthorized(String),

    /// The email is not on the authorization list.
    #[error("rider email not authorized: {0}")]
    NotAuthorized(String),

    /// An underlying store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
