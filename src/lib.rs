//! # Delivery Tracking
//!
//! > **Order lifecycle and real-time delivery tracking over a document store.**
//!
//! This crate implements the order-tracking subsystem of a delivery
//! storefront: placing orders, moving them through an enforced status state
//! machine, assigning riders, streaming location and status updates to
//! subscribers, and reconciling a customer's history across the two identity
//! keys they may have ordered under (phone and email).
//!
//! The catalog, cart, and every screen are external collaborators: they call
//! the services here with plain data and render whatever comes back.
//!
//! ## 🏗️ Design
//!
//! All durable state lives in a single document-store task; the services own
//! nothing. Every read is a fresh query or a live subscription, so there is
//! no in-process cache to invalidate, and because the store processes one
//! request at a time, its atomic upsert closes the classic check-then-act
//! race on rider registration.
//!
//! What the store deliberately does *not* do is enforce domain rules. The
//! status transition graph, the rider-assignment window, and the fail-closed
//! authorization check are all service-level policy, tested at that level.
//!
//! ## 🗺️ Module Tour
//!
//! - **[`store`]**: the engine. The document-store task, its client, write
//!   payloads with server-timestamp sentinels, and subscription handles.
//! - **[`model`]**: pure domain records ([`Order`](model::Order),
//!   [`Rider`](model::Rider), [`AuthorizedRider`](model::AuthorizedRider))
//!   and the [`OrderStatus`](model::OrderStatus) state machine.
//! - **[`orders`]**: the order lifecycle service, including customer-history
//!   reconciliation and the order feeds.
//! - **[`riders`]**: the rider directory and live location feed.
//! - **[`access`]**: the rider-dashboard authorization gate.
//! - **[`lifecycle`]**: the [`TrackingSystem`] orchestrator and tracing
//!   setup.
//!
//! ## 🚀 Quick Start
//!
//! ```ignore
//! let system = TrackingSystem::new();
//!
//! let order = system.orders.create_order(params).await?;
//! system.orders.update_order_status(&order.id, OrderStatus::Confirmed, Fields::new()).await?;
//! system.orders.assign_rider(&order.id, "rider-9").await?;
//!
//! let mut feed = system.orders.subscribe_order(&order.id).await;
//! while let Some(snapshot) = feed.recv().await {
//!     // render the tracking screen
//! }
//! ```
//!
//! Run the demo scenario with `RUST_LOG=info cargo run`.

pub mod access;
pub mod lifecycle;
pub mod model;
pub mod orders;
pub mod riders;
pub mod store;

// Re-export the entry points most callers need.
pub use lifecycle::TrackingSystem;
pub use store::LiveFeed;
