//! # Store Client
//!
//! The caller-side handle to the [`DocumentStore`](crate::store::DocumentStore)
//! task. Holds only a channel sender, so cloning is cheap and every service
//! shares the same store through its own clone. All methods suspend until the
//! store has applied the operation and replied.

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::store::document::{Document, WriteFields};
use crate::store::error::StoreError;
use crate::store::message::{Direction, StoreRequest};
use crate::store::subscription::{DocSubscription, QuerySubscription};

/// A type-safe async handle to the document store.
#[derive(Debug, Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub(crate) fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<T, StoreError>>) -> StoreRequest,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }

    /// Creates a document with a store-assigned id; returns the stored record.
    pub async fn create(&self, collection: &str, fields: WriteFields) -> Result<Document, StoreError> {
        let collection = collection.to_string();
        self.request(|respond_to| StoreRequest::Create { collection, fields, respond_to })
            .await
    }

    pub async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collection = collection.to_string();
        let id = id.to_string();
        self.request(|respond_to| StoreRequest::Get { collection, id, respond_to })
            .await
    }

    /// Partial write: updates only the named fields, `NotFound` on absent id.
    pub async fn merge(&self, collection: &str, id: &str, fields: WriteFields) -> Result<(), StoreError> {
        let collection = collection.to_string();
        let id = id.to_string();
        self.request(|respond_to| StoreRequest::Merge { collection, id, fields, respond_to })
            .await
    }

    /// Atomic insert-if-absent (with `insert`), else merge (with `merge`).
    pub async fn upsert(
        &self,
        collection: &str,
        id: &str,
        insert: WriteFields,
        merge: WriteFields,
    ) -> Result<(), StoreError> {
        let collection = collection.to_string();
        let id = id.to_string();
        self.request(|respond_to| StoreRequest::Upsert { collection, id, insert, merge, respond_to })
            .await
    }

    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let collection = collection.to_string();
        let id = id.to_string();
        self.request(|respond_to| StoreRequest::Delete { collection, id, respond_to })
            .await
    }

    /// All documents whose `field` equals `value`, in no particular order.
    pub async fn query_eq(&self, collection: &str, field: &str, value: Value) -> Result<Vec<Document>, StoreError> {
        let collection = collection.to_string();
        let field = field.to_string();
        self.request(|respond_to| StoreRequest::QueryEq { collection, field, value, respond_to })
            .await
    }

    /// The whole collection ordered by a timestamp field.
    pub async fn query_all_ordered(
        &self,
        collection: &str,
        order_field: &str,
        direction: Direction,
    ) -> Result<Vec<Document>, StoreError> {
        let collection = collection.to_string();
        let order_field = order_field.to_string();
        self.request(|respond_to| StoreRequest::QueryAllOrdered {
            collection,
            order_field,
            direction,
            respond_to,
        })
        .await
    }

    /// Live feed of one document; delivers an immediate snapshot.
    pub async fn subscribe_doc(&self, collection: &str, id: &str) -> Result<DocSubscription, StoreError> {
        let collection = collection.to_string();
        let id = id.to_string();
        self.request(|respond_to| StoreRequest::SubscribeDoc { collection, id, respond_to })
            .await
    }

    /// Live feed of an ordered query; delivers an immediate snapshot.
    pub async fn subscribe_query(
        &self,
        collection: &str,
        order_field: &str,
        direction: Direction,
    ) -> Result<QuerySubscription, StoreError> {
        let collection = collection.to_string();
        let order_field = order_field.to_string();
        self.request(|respond_to| StoreRequest::SubscribeQuery {
            collection,
            order_field,
            direction,
            respond_to,
        })
        .await
    }
}
