//! # Store Messages
//!
//! The request types sent from [`StoreClient`](crate::store::StoreClient) to
//! the [`DocumentStore`](crate::store::DocumentStore) task. Every variant
//! carries a oneshot responder, so each call is a request/reply pair and the
//! caller suspends until the store has applied the operation.

use serde_json::Value;
use tokio::sync::oneshot;

use crate::store::document::{Document, WriteFields};
use crate::store::error::StoreError;
use crate::store::subscription::{DocSubscription, QuerySubscription};

/// Type alias for the oneshot response channel used by the store.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Sort direction for ordered queries and query subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A request to the document store.
///
/// The surface mirrors what the remote collaborator offers: document CRUD
/// with merge semantics, an atomic upsert, equality and ordered queries, and
/// live subscriptions. There is deliberately no compound query; ordering an
/// equality result set is the caller's job, exactly as it is against the real
/// backend.
#[derive(Debug)]
pub enum StoreRequest {
    Create {
        collection: String,
        fields: WriteFields,
        respond_to: Response<Document>,
    },
    Get {
        collection: String,
        id: String,
        respond_to: Response<Option<Document>>,
    },
    Merge {
        collection: String,
        id: String,
        fields: WriteFields,
        respond_to: Response<()>,
    },
    /// Atomic insert-if-absent, else merge. One message, one state check;
    /// there is no observable window between the check and the write.
    Upsert {
        collection: String,
        id: String,
        insert: WriteFields,
        merge: WriteFields,
        respond_to: Response<()>,
    },
    /// Idempotent: deleting an absent id is not an error.
    Delete {
        collection: String,
        id: String,
        respond_to: Response<()>,
    },
    QueryEq {
        collection: String,
        field: String,
        value: Value,
        respond_to: Response<Vec<Document>>,
    },
    QueryAllOrdered {
        collection: String,
        order_field: String,
        direction: Direction,
        respond_to: Response<Vec<Document>>,
    },
    SubscribeDoc {
        collection: String,
        id: String,
        respond_to: Response<DocSubscription>,
    },
    SubscribeQuery {
        collection: String,
        order_field: String,
        direction: Direction,
        respond_to: Response<QuerySubscription>,
    },
}
