//! # Document Store
//!
//! This module is the engine of the subsystem: an in-process document store that
//! stands in for the remote, eventually-consistent document database backing the
//! storefront. It implements the "Server" side of the Actor Model: a single
//! Tokio task owns every collection and processes requests sequentially, so the
//! store needs no locks and every write to a collection is totally ordered by
//! its arrival on the request channel.
//!
//! ## Architecture
//!
//! The store separates concerns into three layers:
//!
//! 1. **Data Layer** ([`Document`], [`WriteFields`], [`Timestamp`]): the
//!    schema-flexible document shapes and the write-time sentinel values.
//! 2. **Runtime Layer** ([`DocumentStore`]): the message loop, collection
//!    state, watcher bookkeeping, and the monotonic server clock.
//! 3. **Interface Layer** ([`StoreClient`]): a cheap-to-clone, type-safe
//!    async handle that forwards requests over an mpsc channel and receives
//!    results on oneshot channels.
//!
//! ## Primitives
//!
//! The store exposes exactly the contract the higher services are written
//! against: `create` (server-assigned id), `get`, `merge` (partial write that
//! leaves unnamed fields untouched), `upsert` (atomic insert-if-absent, else
//! merge), `delete`, single-field equality queries, ordered full-collection
//! queries, and live subscriptions on a document or an ordered query.
//!
//! ## Server timestamps
//!
//! Callers never stamp time themselves. A write names the fields that should
//! receive a server timestamp via [`WriteFields::server_timestamp`], and the
//! store resolves them against its monotonic clock at apply time, so a later
//! write always carries a strictly greater timestamp, even within one wall
//! millisecond.
//!
//! ## Subscriptions
//!
//! A subscription is a handle owned by the caller ([`DocSubscription`],
//! [`QuerySubscription`]), not a registered callback. Dropping the handle ends
//! delivery; the store prunes the dead sender on the next push. Every
//! subscription receives one immediate snapshot on registration.

pub mod actor;
pub mod client;
pub mod document;
pub mod error;
pub mod message;
pub mod subscription;
pub mod timestamp;

pub use actor::DocumentStore;
pub use client::StoreClient;
pub use document::{Document, Fields, WriteFields, WriteValue};
pub use error::StoreError;
pub use message::{Direction, StoreRequest};
pub use subscription::{DocSubscription, LiveFeed, QuerySubscription};
pub use timestamp::{normalize_millis, Timestamp};
