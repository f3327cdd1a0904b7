//! # Store Errors
//!
//! Centralized error definitions for the document store, shared by every
//! service client.

/// Errors surfaced by the document store itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store task is gone; its request channel is closed.
    #[error("document store closed")]
    Closed,

    /// The store dropped the response channel before answering.
    #[error("document store dropped the response")]
    Dropped,

    /// A merge targeted an id that does not exist.
    #[error("document not found: {0}")]
    NotFound(String),
}
