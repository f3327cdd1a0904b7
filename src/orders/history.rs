//! # Customer Order History Reconciliation
//!
//! A customer may have placed orders under a phone number on one visit and an
//! email on another, so a single identifier is matched against both contact
//! fields. The two equality queries run concurrently and independently: a
//! failure of either leg is logged and treated as an empty result, never
//! aborting the other. An incomplete history beats a blank screen.

use serde_json::json;
use tracing::warn;

use crate::model::Order;
use crate::store::{document, Document, StoreClient, StoreError};

use super::ORDERS;

/// All orders matching `identifier` on either contact field, deduplicated and
/// newest first.
pub(crate) async fn customer_orders(store: &StoreClient, identifier: &str) -> Vec<Order> {
    let (by_phone, by_email) = tokio::join!(
        store.query_eq(ORDERS, "customerPhone", json!(identifier)),
        store.query_eq(ORDERS, "customerEmail", json!(identifier)),
    );
    merge_identity_results(
        decode_leg(by_phone, "customerPhone"),
        decode_leg(by_email, "customerEmail"),
    )
}

fn decode_leg(result: Result<Vec<Document>, StoreError>, field: &str) -> Vec<Order> {
    match result {
        Ok(docs) => document::decode_all(docs, "order"),
        Err(error) => {
            warn!(field, %error, "Identifier query failed, treating as empty");
            Vec::new()
        }
    }
}

/// Unions the two result sets on order id (the phone-sourced entry wins a
/// collision) and sorts by `createdAt` descending, id as a stable tie-break.
pub(crate) fn merge_identity_results(by_phone: Vec<Order>, by_email: Vec<Order>) -> Vec<Order> {
    let mut merged = by_phone;
    for order in by_email {
        if !merged.iter().any(|existing| existing.id == order.id) {
            merged.push(order);
        }
    }
    merged.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    merged
}
