//! # System Lifecycle & Orchestration
//!
//! Individual pieces of the subsystem are simple; wiring them is where the
//! coordination lives. This module provides the conductor:
//!
//! 1. **Store startup**: spawn the document store task
//! 2. **Service wiring**: hand each service its own clone of the store client
//! 3. **Graceful shutdown**: drop the clients, let the store drain and exit,
//!    then await its task
//! 4. **Observability setup**: initialize the tracing subscriber
//!
//! ## Shutdown
//!
//! The store task exits when every [`StoreClient`](crate::store::StoreClient)
//! clone is gone. [`TrackingSystem::shutdown`] consumes the system, dropping
//! the three services and with them their clients; live feed handles hold only
//! receivers and never keep the store alive. Clones of the services handed out
//! elsewhere must be dropped by their owners first, or shutdown will wait on
//! them.

pub mod system;
pub mod tracing;

pub use system::TrackingSystem;
pub use tracing::setup_tracing;
