//! # Order Lifecycle Service
//!
//! Owns order creation, status transitions, rider assignment, rider-location
//! propagation, and every order read the UI collaborators need, including
//! the cross-identity customer history reconciliation.
//!
//! The status state machine is enforced here, not merely documented: a
//! transition off the graph is rejected with a typed error, and `dispatched`
//! is reachable only through [`OrderService::assign_rider`]. The store itself
//! stays permissive; enforcement is a service concern.
//!
//! Propagation policy follows the rest of the subsystem: mutating operations
//! return errors for the UI to present; reads degrade to `None`/empty when
//! the backend is not configured, since they drive passive display.

pub mod error;
pub mod feed;
mod history;

pub use error::OrderError;
pub use feed::{OrderFeed, OrdersFeed};

use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::model::{GeoPoint, Order, OrderCreate, OrderStatus};
use crate::store::{document, Direction, Fields, StoreClient, WriteFields};

pub(crate) const ORDERS: &str = "orders";

/// Client-facing service for the `orders` collection.
#[derive(Debug, Clone)]
pub struct OrderService {
    backend: Option<StoreClient>,
}

impl OrderService {
    pub fn new(store: StoreClient) -> Self {
        Self { backend: Some(store) }
    }

    /// A service with no backend: mutating calls fail with
    /// [`OrderError::BackendUnavailable`], reads return empty results, and
    /// feeds terminate immediately.
    pub fn unconfigured() -> Self {
        Self { backend: None }
    }

    fn store(&self) -> Result<&StoreClient, OrderError> {
        self.backend.as_ref().ok_or(OrderError::BackendUnavailable)
    }

    /// Places a new order.
    ///
    /// Validates only what later lookups depend on: at least one line item and
    /// at least one usable contact key. Stamps `status=placed`, null rider
    /// fields, and both server timestamps; returns the stored record with its
    /// generated id.
    #[instrument(skip(self, params))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<Order, OrderError> {
        let store = self.store()?;
        if params.items.is_empty() {
            return Err(OrderError::Validation("order has no line items".into()));
        }
        if !params.has_contact() {
            return Err(OrderError::Validation("order has no customer contact".into()));
        }

        let fields = WriteFields::new()
            .set("items", serde_json::to_value(&params.items)?)
            .set("customerPhone", params.customer_phone)
            .set("customerEmail", params.customer_email)
            .set("deliveryAddress", params.delivery_address)
            .set("status", OrderStatus::Placed.as_str())
            .set("riderId", Value::Null)
            .set("riderLocation", Value::Null)
            .set("estimatedDeliveryTime", Value::Null)
            .server_timestamp("createdAt")
            .server_timestamp("updatedAt");

        let doc = store.create(ORDERS, fields).await.map_err(OrderError::store)?;
        let order: Order = doc.decode()?;
        info!(order_id = %order.id, "Order placed");
        Ok(order)
    }

    /// Moves an order to `status`, merging any `extra` fields alongside.
    ///
    /// The transition is checked against the current document first; `extra`
    /// cannot override `status` or `updatedAt`. Cancelling an order that
    /// already has a rider clears the rider fields, keeping the invariant
    /// that a rider is attached only to an active delivery.
    #[instrument(skip(self, extra))]
    pub async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        extra: Fields,
    ) -> Result<(), OrderError> {
        let store = self.store()?;
        if status == OrderStatus::Dispatched {
            return Err(OrderError::RiderRequired);
        }

        let current = self.require_order(order_id).await?;
        if !current.status.can_transition_to(status) {
            warn!(order_id, from = %current.status, to = %status, "Rejected transition");
            return Err(OrderError::InvalidTransition { from: current.status, to: status });
        }

        let mut fields = WriteFields::new()
            .with_fields(extra)
            .set("status", status.as_str())
            .server_timestamp("updatedAt");
        if status == OrderStatus::Cancelled && current.rider_id.is_some() {
            fields = fields.set("riderId", Value::Null).set("riderLocation", Value::Null);
        }

        store.merge(ORDERS, order_id, fields).await.map_err(OrderError::store)?;
        info!(order_id, from = %current.status, to = %status, "Status updated");
        Ok(())
    }

    /// Assigns a rider and moves the order to `dispatched` in one write, the
    /// single entry point for reaching that state.
    ///
    /// Permitted while the order is placed, confirmed, or already dispatched
    /// (re-assignment before the rider leaves); rejected once the order is in
    /// transit, delivered, or cancelled.
    #[instrument(skip(self))]
    pub async fn assign_rider(&self, order_id: &str, rider_id: &str) -> Result<(), OrderError> {
        let store = self.store()?;
        let current = self.require_order(order_id).await?;
        if !current.status.can_assign_rider() {
            warn!(order_id, rider_id, from = %current.status, "Rejected rider assignment");
            return Err(OrderError::InvalidTransition {
                from: current.status,
                to: OrderStatus::Dispatched,
            });
        }

        let fields = WriteFields::new()
            .set("riderId", rider_id)
            .set("status", OrderStatus::Dispatched.as_str())
            .server_timestamp("updatedAt");
        store.merge(ORDERS, order_id, fields).await.map_err(OrderError::store)?;
        info!(order_id, rider_id, "Rider assigned");
        Ok(())
    }

    /// Patches the rider-location snapshot on an order. Status is untouched.
    #[instrument(skip(self, location))]
    pub async fn update_rider_location(
        &self,
        order_id: &str,
        location: GeoPoint,
    ) -> Result<(), OrderError> {
        let store = self.store()?;
        let fields = WriteFields::new()
            .set("riderLocation", serde_json::to_value(location)?)
            .server_timestamp("updatedAt");
        store.merge(ORDERS, order_id, fields).await.map_err(OrderError::store)
    }

    pub async fn get_order(&self, order_id: &str) -> Result<Option<Order>, OrderError> {
        let Some(store) = &self.backend else { return Ok(None) };
        let Some(doc) = store.get(ORDERS, order_id).await.map_err(OrderError::store)? else {
            return Ok(None);
        };
        Ok(Some(doc.decode()?))
    }

    /// Every order, newest first (admin view).
    pub async fn get_all_orders(&self) -> Result<Vec<Order>, OrderError> {
        let Some(store) = &self.backend else { return Ok(Vec::new()) };
        let docs = store
            .query_all_ordered(ORDERS, "createdAt", Direction::Descending)
            .await
            .map_err(OrderError::store)?;
        Ok(document::decode_all(docs, "order"))
    }

    /// Orders assigned to a rider, newest first.
    ///
    /// The store's equality query is unordered (no compound server-side
    /// ordering on an equality filter), so this sorts client-side.
    pub async fn get_rider_orders(&self, rider_id: &str) -> Result<Vec<Order>, OrderError> {
        let Some(store) = &self.backend else { return Ok(Vec::new()) };
        let docs = store
            .query_eq(ORDERS, "riderId", json!(rider_id))
            .await
            .map_err(OrderError::store)?;
        let mut orders: Vec<Order> = document::decode_all(docs, "order");
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(orders)
    }

    /// A customer's order history across both contact identities: both
    /// contact fields are queried independently, the union is deduplicated on
    /// order id (phone-sourced entry wins), and the result is newest first.
    #[instrument(skip(self))]
    pub async fn get_customer_orders(&self, identifier: &str) -> Result<Vec<Order>, OrderError> {
        let Some(store) = &self.backend else { return Ok(Vec::new()) };
        if identifier.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(history::customer_orders(store, identifier).await)
    }

    /// Live feed of one order.
    pub async fn subscribe_order(&self, order_id: &str) -> OrderFeed {
        let Some(store) = &self.backend else { return OrderFeed { inner: None } };
        match store.subscribe_doc(ORDERS, order_id).await {
            Ok(sub) => OrderFeed { inner: Some(sub) },
            Err(error) => {
                warn!(order_id, %error, "Order subscription failed");
                OrderFeed { inner: None }
            }
        }
    }

    /// Live feed of all orders, newest first (admin view).
    pub async fn subscribe_all_orders(&self) -> OrdersFeed {
        let Some(store) = &self.backend else { return OrdersFeed { inner: None } };
        match store.subscribe_query(ORDERS, "createdAt", Direction::Descending).await {
            Ok(sub) => OrdersFeed { inner: Some(sub) },
            Err(error) => {
                warn!(%error, "Orders subscription failed");
                OrdersFeed { inner: None }
            }
        }
    }

    async fn require_order(&self, order_id: &str) -> Result<Order, OrderError> {
        let store = self.store()?;
        let doc = store
            .get(ORDERS, order_id)
            .await
            .map_err(OrderError::store)?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))?;
        Ok(doc.decode()?)
    }
}
