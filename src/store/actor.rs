//! # Document Store Task
//!
//! The server half of the store. It owns every collection and processes
//! requests sequentially from an mpsc channel, one message at a time, so no
//! locking and no observable interleaving inside an operation. `Upsert` is
//! atomic for exactly this reason: the absence check and the write happen
//! inside one message.
//!
//! Watchers are notified *before* the operation's reply is sent, so once a
//! caller's write resolves, every subscription snapshot for that write is
//! already queued.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::store::client::StoreClient;
use crate::store::document::{Document, Fields};
use crate::store::error::StoreError;
use crate::store::message::{Direction, StoreRequest};
use crate::store::subscription::{DocSubscription, QuerySubscription};
use crate::store::timestamp::{normalize_millis, TimestampClock};

/// The store task. Create with [`DocumentStore::new`], then spawn
/// [`DocumentStore::run`]; the task exits when every [`StoreClient`] clone has
/// been dropped.
pub struct DocumentStore {
    receiver: mpsc::Receiver<StoreRequest>,
    collections: HashMap<String, Collection>,
    clock: TimestampClock,
    next_id: u64,
}

#[derive(Default)]
struct Collection {
    docs: HashMap<String, Fields>,
    doc_watchers: HashMap<String, Vec<mpsc::UnboundedSender<Option<Document>>>>,
    query_watchers: Vec<QueryWatcher>,
}

struct QueryWatcher {
    order_field: String,
    direction: Direction,
    sender: mpsc::UnboundedSender<Vec<Document>>,
}

impl DocumentStore {
    /// Creates the store and its client.
    ///
    /// `buffer_size` is the capacity of the request channel; callers wait for
    /// space when it is full.
    pub fn new(buffer_size: usize) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            collections: HashMap::new(),
            clock: TimestampClock::default(),
            next_id: 1,
        };
        (store, StoreClient::new(sender))
    }

    /// Runs the request loop until the channel closes.
    pub async fn run(mut self) {
        info!("Document store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Create { collection, fields, respond_to } => {
                    let id = format!("doc_{}", self.next_id);
                    self.next_id += 1;
                    let resolved = fields.resolve(&mut self.clock);
                    let coll = self.collections.entry(collection.clone()).or_default();
                    coll.docs.insert(id.clone(), resolved.clone());
                    info!(collection = %collection, id = %id, size = coll.docs.len(), "Created");
                    coll.notify(&id);
                    let _ = respond_to.send(Ok(Document { id, fields: resolved }));
                }
                StoreRequest::Get { collection, id, respond_to } => {
                    let doc = self.document(&collection, &id);
                    debug!(collection = %collection, id = %id, found = doc.is_some(), "Get");
                    let _ = respond_to.send(Ok(doc));
                }
                StoreRequest::Merge { collection, id, fields, respond_to } => {
                    let resolved = fields.resolve(&mut self.clock);
                    let coll = self.collections.entry(collection.clone()).or_default();
                    match coll.docs.get_mut(&id) {
                        Some(doc) => {
                            for (field, value) in resolved {
                                doc.insert(field, value);
                            }
                            info!(collection = %collection, id = %id, "Merged");
                            coll.notify(&id);
                            let _ = respond_to.send(Ok(()));
                        }
                        None => {
                            warn!(collection = %collection, id = %id, "Not found");
                            let _ = respond_to.send(Err(StoreError::NotFound(id)));
                        }
                    }
                }
                StoreRequest::Upsert { collection, id, insert, merge, respond_to } => {
                    let existing = self
                        .collections
                        .get(&collection)
                        .is_some_and(|coll| coll.docs.contains_key(&id));
                    let resolved = if existing { merge } else { insert }.resolve(&mut self.clock);
                    let coll = self.collections.entry(collection.clone()).or_default();
                    match coll.docs.entry(id.clone()) {
                        Entry::Occupied(mut slot) => {
                            let doc = slot.get_mut();
                            for (field, value) in resolved {
                                doc.insert(field, value);
                            }
                            info!(collection = %collection, id = %id, "Upsert merged");
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(resolved);
                            info!(collection = %collection, id = %id, "Upsert inserted");
                        }
                    }
                    coll.notify(&id);
                    let _ = respond_to.send(Ok(()));
                }
                StoreRequest::Delete { collection, id, respond_to } => {
                    let coll = self.collections.entry(collection.clone()).or_default();
                    if coll.docs.remove(&id).is_some() {
                        info!(collection = %collection, id = %id, size = coll.docs.len(), "Deleted");
                        coll.notify(&id);
                    } else {
                        debug!(collection = %collection, id = %id, "Delete of absent id");
                    }
                    let _ = respond_to.send(Ok(()));
                }
                StoreRequest::QueryEq { collection, field, value, respond_to } => {
                    let matches = self
                        .collections
                        .get(&collection)
                        .map(|coll| coll.query_eq(&field, &value))
                        .unwrap_or_default();
                    debug!(collection = %collection, field = %field, count = matches.len(), "QueryEq");
                    let _ = respond_to.send(Ok(matches));
                }
                StoreRequest::QueryAllOrdered { collection, order_field, direction, respond_to } => {
                    let docs = self
                        .collections
                        .get(&collection)
                        .map(|coll| ordered_snapshot(&coll.docs, &order_field, direction))
                        .unwrap_or_default();
                    debug!(collection = %collection, order_field = %order_field, count = docs.len(), "QueryAllOrdered");
                    let _ = respond_to.send(Ok(docs));
                }
                StoreRequest::SubscribeDoc { collection, id, respond_to } => {
                    let coll = self.collections.entry(collection.clone()).or_default();
                    let (sender, sub) = DocSubscription::channel();
                    let snapshot = coll.docs.get(&id).map(|fields| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    });
                    let _ = sender.send(snapshot);
                    coll.doc_watchers.entry(id.clone()).or_default().push(sender);
                    debug!(collection = %collection, id = %id, "Document watcher added");
                    let _ = respond_to.send(Ok(sub));
                }
                StoreRequest::SubscribeQuery { collection, order_field, direction, respond_to } => {
                    let coll = self.collections.entry(collection.clone()).or_default();
                    let (sender, sub) = QuerySubscription::channel();
                    let _ = sender.send(ordered_snapshot(&coll.docs, &order_field, direction));
                    coll.query_watchers.push(QueryWatcher { order_field, direction, sender });
                    debug!(collection = %collection, watchers = coll.query_watchers.len(), "Query watcher added");
                    let _ = respond_to.send(Ok(sub));
                }
            }
        }

        info!(collections = self.collections.len(), "Document store shut down");
    }

    fn document(&self, collection: &str, id: &str) -> Option<Document> {
        self.collections
            .get(collection)?
            .docs
            .get(id)
            .map(|fields| Document { id: id.to_string(), fields: fields.clone() })
    }
}

impl Collection {
    fn query_eq(&self, field: &str, value: &Value) -> Vec<Document> {
        self.docs
            .iter()
            .filter(|(_, fields)| fields.get(field) == Some(value))
            .map(|(id, fields)| Document { id: id.clone(), fields: fields.clone() })
            .collect()
    }

    /// Pushes fresh snapshots to every watcher touched by a change to `id`,
    /// pruning watchers whose handles were dropped.
    fn notify(&mut self, id: &str) {
        if let Some(watchers) = self.doc_watchers.get_mut(id) {
            let snapshot = self.docs.get(id).map(|fields| Document {
                id: id.to_string(),
                fields: fields.clone(),
            });
            watchers.retain(|watcher| watcher.send(snapshot.clone()).is_ok());
            if watchers.is_empty() {
                self.doc_watchers.remove(id);
            }
        }
        let docs = &self.docs;
        self.query_watchers.retain(|watcher| {
            let snapshot = ordered_snapshot(docs, &watcher.order_field, watcher.direction);
            watcher.sender.send(snapshot).is_ok()
        });
    }
}

fn ordered_snapshot(docs: &HashMap<String, Fields>, order_field: &str, direction: Direction) -> Vec<Document> {
    let mut out: Vec<Document> = docs
        .iter()
        .map(|(id, fields)| Document { id: id.clone(), fields: fields.clone() })
        .collect();
    out.sort_by(|a, b| {
        let ka = normalize_millis(a.fields.get(order_field).unwrap_or(&Value::Null));
        let kb = normalize_millis(b.fields.get(order_field).unwrap_or(&Value::Null));
        let by_time = match direction {
            Direction::Ascending => ka.cmp(&kb),
            Direction::Descending => kb.cmp(&ka),
        };
        by_time.then_with(|| a.id.cmp(&b.id))
    });
    out
}
