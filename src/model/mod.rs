//! # Domain Records
//!
//! Pure data structures for the three record kinds the subsystem manages.
//! Each serializes to the camelCase document shape the store collaborator
//! already holds, and deserializes tolerantly: optional fields default, and
//! timestamp fields normalize through the versioned-read adapter in
//! [`crate::store::timestamp`].

pub mod access;
pub mod order;
pub mod rider;

pub use access::AuthorizedRider;
pub use order::{Order, OrderCreate, OrderItem, OrderStatus};
pub use rider::Rider;

use serde::{Deserialize, Serialize};

/// A latitude/longitude snapshot, as pushed by a rider's device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}
