//! Demo scenario: one order through its whole life, with live feeds attached.
//!
//! Run with `RUST_LOG=info cargo run` for compact logs, `RUST_LOG=debug` to
//! see every store operation.

use delivery_tracking::lifecycle::setup_tracing;
use delivery_tracking::model::{GeoPoint, OrderCreate, OrderItem, OrderStatus};
use delivery_tracking::store::Fields;
use delivery_tracking::{LiveFeed, TrackingSystem};
use serde_json::json;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting delivery tracking demo");
    let system = TrackingSystem::new();

    // An admin authorizes the rider's dashboard email.
    system
        .access
        .authorize("Rider.Nine@example.com", Some("Rider Nine"))
        .await
        .map_err(|e| e.to_string())?;
    let authorized = system.access.is_authorized("rider.nine@EXAMPLE.com").await;
    info!(authorized, "Dashboard access check");

    // The rider's device registers itself.
    let mut profile = Fields::new();
    profile.insert("name".into(), json!("Rider Nine"));
    profile.insert("vehicle".into(), json!("bike"));
    system
        .riders
        .create_or_update_rider("rider-9", profile)
        .await
        .map_err(|e| e.to_string())?;

    // A customer checks out.
    let span = tracing::info_span!("order_processing");
    let order = async {
        let params = OrderCreate {
            items: vec![OrderItem {
                product_id: "prod-42".into(),
                name: "Denim Jacket".into(),
                quantity: 1,
                size: Some("M".into()),
                color: Some("indigo".into()),
                unit_price: 59.0,
            }],
            customer_phone: Some("0711".into()),
            customer_email: Some("casey@example.com".into()),
            delivery_address: Some("14 Acacia Ave".into()),
        };
        system.orders.create_order(params).await
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;
    info!(order_id = %order.id, status = %order.status, "Order placed");

    // The customer's tracking screen and map attach.
    let mut order_feed = system.orders.subscribe_order(&order.id).await;
    let mut location_feed = system.riders.subscribe_location("rider-9").await;
    order_feed.recv().await; // initial snapshots
    location_feed.recv().await;

    // The kitchen confirms, a dispatcher assigns the rider.
    system
        .orders
        .update_order_status(&order.id, OrderStatus::Confirmed, Fields::new())
        .await
        .map_err(|e| e.to_string())?;
    system
        .orders
        .assign_rider(&order.id, "rider-9")
        .await
        .map_err(|e| e.to_string())?;

    if let Some(Some(snapshot)) = order_feed.recv().await {
        info!(status = %snapshot.status, "Tracking screen update");
    }
    if let Some(Some(snapshot)) = order_feed.recv().await {
        info!(status = %snapshot.status, rider = ?snapshot.rider_id, "Tracking screen update");
    }

    // The rider heads out, pushing locations as they go.
    system
        .orders
        .update_order_status(&order.id, OrderStatus::InTransit, Fields::new())
        .await
        .map_err(|e| e.to_string())?;
    for (lat, lng) in [(1.30, 36.80), (1.31, 36.82)] {
        let point = GeoPoint { lat, lng };
        system
            .riders
            .update_location("rider-9", point)
            .await
            .map_err(|e| e.to_string())?;
        system
            .orders
            .update_rider_location(&order.id, point)
            .await
            .map_err(|e| e.to_string())?;
        if let Some(Some(point)) = location_feed.recv().await {
            info!(lat = point.lat, lng = point.lng, "Rider moved");
        }
    }

    // Delivered; the customer's history shows the finished order.
    system
        .orders
        .update_order_status(&order.id, OrderStatus::Delivered, Fields::new())
        .await
        .map_err(|e| e.to_string())?;
    let history = system
        .orders
        .get_customer_orders("0711")
        .await
        .map_err(|e| e.to_string())?;
    if let Some(latest) = history.first() {
        info!(orders = history.len(), status = %latest.status, "Customer history");
    }

    drop(order_feed);
    drop(location_feed);
    system.shutdown().await?;

    info!("Demo completed");
    Ok(())
}
