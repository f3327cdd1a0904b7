//! End-to-end order lifecycle through the full system: placement, the
//! enforced status graph, rider assignment, and location propagation.

use delivery_tracking::model::{GeoPoint, OrderCreate, OrderItem, OrderStatus};
use delivery_tracking::orders::OrderError;
use delivery_tracking::store::Fields;
use delivery_tracking::TrackingSystem;

fn jacket_order(phone: &str) -> OrderCreate {
    OrderCreate {
        items: vec![OrderItem {
            product_id: "prod-42".into(),
            name: "Denim Jacket".into(),
            quantity: 1,
            size: Some("M".into()),
            color: Some("indigo".into()),
            unit_price: 59.0,
        }],
        customer_phone: Some(phone.into()),
        customer_email: None,
        delivery_address: Some("14 Acacia Ave".into()),
    }
}

#[tokio::test]
async fn create_order_stamps_initial_state() {
    let system = TrackingSystem::new();

    let order = system.orders.create_order(jacket_order("0711")).await.unwrap();
    assert_eq!(order.status, OrderStatus::Placed);
    assert!(order.rider_id.is_none());
    assert!(order.rider_location.is_none());
    assert!(order.estimated_delivery_time.is_none());
    assert!(order.created_at.millis() > 0);

    let fetched = system.orders.get_order(&order.id).await.unwrap().unwrap();
    assert_eq!(fetched.customer_phone.as_deref(), Some("0711"));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn create_order_validates_items_and_contact() {
    let system = TrackingSystem::new();

    let no_items = OrderCreate {
        customer_phone: Some("0711".into()),
        ..Default::default()
    };
    assert!(matches!(
        system.orders.create_order(no_items).await,
        Err(OrderError::Validation(_))
    ));

    let mut no_contact = jacket_order("0711");
    no_contact.customer_phone = None;
    assert!(matches!(
        system.orders.create_order(no_contact).await,
        Err(OrderError::Validation(_))
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn full_delivery_flow() {
    let system = TrackingSystem::new();
    let order = system.orders.create_order(jacket_order("0711")).await.unwrap();

    system
        .orders
        .update_order_status(&order.id, OrderStatus::Confirmed, Fields::new())
        .await
        .unwrap();
    system.orders.assign_rider(&order.id, "rider-9").await.unwrap();

    // Assigned orders show up on the rider's list, dispatched and newest first.
    let rider_orders = system.orders.get_rider_orders("rider-9").await.unwrap();
    assert_eq!(rider_orders.len(), 1);
    assert_eq!(rider_orders[0].id, order.id);
    assert_eq!(rider_orders[0].status, OrderStatus::Dispatched);
    assert_eq!(rider_orders[0].rider_id.as_deref(), Some("rider-9"));

    // Location updates never touch status.
    let point = GeoPoint { lat: 1.0, lng: 2.0 };
    system.orders.update_rider_location(&order.id, point).await.unwrap();
    let current = system.orders.get_order(&order.id).await.unwrap().unwrap();
    assert_eq!(current.status, OrderStatus::Dispatched);
    assert_eq!(current.rider_location, Some(point));

    system
        .orders
        .update_order_status(&order.id, OrderStatus::InTransit, Fields::new())
        .await
        .unwrap();
    system
        .orders
        .update_order_status(&order.id, OrderStatus::Delivered, Fields::new())
        .await
        .unwrap();

    let delivered = system.orders.get_order(&order.id).await.unwrap().unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert_eq!(delivered.rider_id.as_deref(), Some("rider-9"));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn transition_graph_is_enforced() {
    let system = TrackingSystem::new();
    let order = system.orders.create_order(jacket_order("0711")).await.unwrap();

    // Skipping states is rejected.
    let skip = system
        .orders
        .update_order_status(&order.id, OrderStatus::Delivered, Fields::new())
        .await;
    assert!(matches!(
        skip,
        Err(OrderError::InvalidTransition { from: OrderStatus::Placed, to: OrderStatus::Delivered })
    ));

    // Dispatch is only reachable through rider assignment.
    assert!(matches!(
        system
            .orders
            .update_order_status(&order.id, OrderStatus::Dispatched, Fields::new())
            .await,
        Err(OrderError::RiderRequired)
    ));

    // Terminal states cannot be resurrected.
    system
        .orders
        .update_order_status(&order.id, OrderStatus::Cancelled, Fields::new())
        .await
        .unwrap();
    assert!(matches!(
        system
            .orders
            .update_order_status(&order.id, OrderStatus::Confirmed, Fields::new())
            .await,
        Err(OrderError::InvalidTransition { from: OrderStatus::Cancelled, .. })
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn assign_rider_window_is_enforced() {
    let system = TrackingSystem::new();
    let order = system.orders.create_order(jacket_order("0711")).await.unwrap();

    // Straight from `placed` is fine, and so is re-assignment while dispatched.
    system.orders.assign_rider(&order.id, "rider-1").await.unwrap();
    system.orders.assign_rider(&order.id, "rider-2").await.unwrap();
    let current = system.orders.get_order(&order.id).await.unwrap().unwrap();
    assert_eq!(current.rider_id.as_deref(), Some("rider-2"));
    assert_eq!(current.status, OrderStatus::Dispatched);

    // Once in transit the assignment is locked.
    system
        .orders
        .update_order_status(&order.id, OrderStatus::InTransit, Fields::new())
        .await
        .unwrap();
    assert!(matches!(
        system.orders.assign_rider(&order.id, "rider-3").await,
        Err(OrderError::InvalidTransition { from: OrderStatus::InTransit, .. })
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn cancelling_a_dispatched_order_clears_the_rider() {
    let system = TrackingSystem::new();
    let order = system.orders.create_order(jacket_order("0711")).await.unwrap();

    system.orders.assign_rider(&order.id, "rider-9").await.unwrap();
    system
        .orders
        .update_rider_location(&order.id, GeoPoint { lat: 1.0, lng: 2.0 })
        .await
        .unwrap();
    system
        .orders
        .update_order_status(&order.id, OrderStatus::Cancelled, Fields::new())
        .await
        .unwrap();

    let cancelled = system.orders.get_order(&order.id).await.unwrap().unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert!(cancelled.rider_id.is_none());
    assert!(cancelled.rider_location.is_none());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn status_update_merges_extra_fields() {
    let system = TrackingSystem::new();
    let order = system.orders.create_order(jacket_order("0711")).await.unwrap();

    let mut extra = Fields::new();
    extra.insert("estimatedDeliveryTime".into(), serde_json::json!({ "millis": 1_900_000 }));
    system
        .orders
        .update_order_status(&order.id, OrderStatus::Confirmed, extra)
        .await
        .unwrap();

    let current = system.orders.get_order(&order.id).await.unwrap().unwrap();
    assert_eq!(current.status, OrderStatus::Confirmed);
    assert_eq!(
        current.estimated_delivery_time.map(|t| t.millis()),
        Some(1_900_000)
    );

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn extra_fields_cannot_override_status() {
    let system = TrackingSystem::new();
    let order = system.orders.create_order(jacket_order("0711")).await.unwrap();

    let mut extra = Fields::new();
    extra.insert("status".into(), serde_json::json!("delivered"));
    system
        .orders
        .update_order_status(&order.id, OrderStatus::Confirmed, extra)
        .await
        .unwrap();

    let current = system.orders.get_order(&order.id).await.unwrap().unwrap();
    assert_eq!(current.status, OrderStatus::Confirmed);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn operations_against_missing_orders_are_not_found() {
    let system = TrackingSystem::new();

    assert!(system.orders.get_order("doc_404").await.unwrap().is_none());
    assert!(matches!(
        system
            .orders
            .update_order_status("doc_404", OrderStatus::Confirmed, Fields::new())
            .await,
        Err(OrderError::NotFound(_))
    ));
    assert!(matches!(
        system.orders.assign_rider("doc_404", "rider-9").await,
        Err(OrderError::NotFound(_))
    ));
    assert!(matches!(
        system
            .orders
            .update_rider_location("doc_404", GeoPoint { lat: 0.0, lng: 0.0 })
            .await,
        Err(OrderError::NotFound(_))
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn all_orders_are_newest_first() {
    let system = TrackingSystem::new();

    let first = system.orders.create_order(jacket_order("0711")).await.unwrap();
    let second = system.orders.create_order(jacket_order("0722")).await.unwrap();
    let third = system.orders.create_order(jacket_order("0733")).await.unwrap();

    let all = system.orders.get_all_orders().await.unwrap();
    let ids: Vec<&str> = all.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, [third.id.as_str(), second.id.as_str(), first.id.as_str()]);

    system.shutdown().await.unwrap();
}
