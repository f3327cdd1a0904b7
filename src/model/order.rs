//! Order record, line items, and the delivery status state machine.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::model::GeoPoint;
use crate::store::Timestamp;

/// Delivery status of an order.
///
/// The graph is closed and only moves forward:
///
/// ```text
/// placed → confirmed → dispatched → in_transit → delivered
///    └─────────┴───────────┴────────────┴→ cancelled
/// ```
///
/// `placed` is the only initial state; `delivered` and `cancelled` are
/// terminal. `dispatched` is reachable only through rider assignment, which
/// the order service enforces on top of this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Placed,
    Confirmed,
    Dispatched,
    InTransit,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Confirmed => "confirmed",
            Self::Dispatched => "dispatched",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether the transition graph allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: Self) -> bool {
        use OrderStatus::*;
        match (self, next) {
            (Placed, Confirmed) => true,
            (Confirmed, Dispatched) => true,
            (Dispatched, InTransit) => true,
            (InTransit, Delivered) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Whether a rider may be assigned while in this state. Re-assignment is
    /// allowed until the rider is actually on the road.
    pub fn can_assign_rider(self) -> bool {
        matches!(self, Self::Placed | Self::Confirmed | Self::Dispatched)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ordered line: a product reference with the chosen variant and price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    #[serde(default)]
    pub name: String,
    pub quantity: u32,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    pub unit_price: f64,
}

/// A customer order as stored, id included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    pub status: OrderStatus,
    #[serde(default)]
    pub rider_id: Option<String>,
    #[serde(default)]
    pub rider_location: Option<GeoPoint>,
    #[serde(default)]
    pub estimated_delivery_time: Option<Timestamp>,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(default)]
    pub updated_at: Timestamp,
}

/// Payload for placing a new order. Everything else (status, rider fields,
/// timestamps) is stamped by the order service.
#[derive(Debug, Clone, Default)]
pub struct OrderCreate {
    pub items: Vec<OrderItem>,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub delivery_address: Option<String>,
}

impl OrderCreate {
    /// At least one contact key must be usable for history lookups later.
    pub fn has_contact(&self) -> bool {
        let usable = |field: &Option<String>| {
            field.as_deref().is_some_and(|value| !value.trim().is_empty())
        };
        usable(&self.customer_phone) || usable(&self.customer_email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn forward_transitions_allowed() {
        use OrderStatus::*;
        assert!(Placed.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Dispatched));
        assert!(Dispatched.can_transition_to(InTransit));
        assert!(InTransit.can_transition_to(Delivered));
    }

    #[test]
    fn cancel_reachable_from_any_non_terminal_state() {
        use OrderStatus::*;
        for from in [Placed, Confirmed, Dispatched, InTransit] {
            assert!(from.can_transition_to(Cancelled), "{from} should cancel");
        }
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn skips_and_resurrections_rejected() {
        use OrderStatus::*;
        assert!(!Placed.can_transition_to(InTransit));
        assert!(!Placed.can_transition_to(Delivered));
        assert!(!Dispatched.can_transition_to(Delivered));
        assert!(!Delivered.can_transition_to(Confirmed));
        assert!(!Cancelled.can_transition_to(Placed));
        assert!(!Confirmed.can_transition_to(Placed));
    }

    #[test]
    fn rider_assignment_window() {
        use OrderStatus::*;
        assert!(Placed.can_assign_rider());
        assert!(Confirmed.can_assign_rider());
        assert!(Dispatched.can_assign_rider());
        assert!(!InTransit.can_assign_rider());
        assert!(!Delivered.can_assign_rider());
        assert!(!Cancelled.can_assign_rider());
    }

    #[test]
    fn status_wire_shape_is_snake_case() {
        assert_eq!(serde_json::to_value(OrderStatus::InTransit).unwrap(), json!("in_transit"));
        let status: OrderStatus = serde_json::from_value(json!("placed")).unwrap();
        assert_eq!(status, OrderStatus::Placed);
    }

    #[test]
    fn order_decodes_from_legacy_document() {
        // Migrated records carry a raw millis number and omit newer fields.
        let order: Order = serde_json::from_value(json!({
            "id": "doc_1",
            "status": "confirmed",
            "customerPhone": "0711",
            "createdAt": 1500
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.created_at.millis(), 1500);
        assert!(order.items.is_empty());
        assert!(order.rider_id.is_none());
        assert!(order.estimated_delivery_time.is_none());
    }

    #[test]
    fn contact_requires_non_blank_value() {
        let mut params = OrderCreate {
            customer_phone: Some("  ".into()),
            ..Default::default()
        };
        assert!(!params.has_contact());
        params.customer_email = Some("a@b.co".into());
        assert!(params.has_contact());
    }
}
