//! Rider directory upserts and the fail-closed authorization gate.

use delivery_tracking::access::{AccessError, AccessService};
use delivery_tracking::model::GeoPoint;
use delivery_tracking::riders::{RiderError, RiderService};
use delivery_tracking::TrackingSystem;
use serde_json::json;

fn profile(name: &str) -> delivery_tracking::store::Fields {
    let mut fields = delivery_tracking::store::Fields::new();
    fields.insert("name".into(), json!(name));
    fields
}

#[tokio::test]
async fn rider_upsert_creates_then_refreshes() {
    let system = TrackingSystem::new();

    system.riders.create_or_update_rider("rider-9", profile("Jules")).await.unwrap();
    let created = system.riders.get_rider("rider-9").await.unwrap().unwrap();
    assert!(created.created_at.millis() > 0);
    assert_eq!(created.profile.get("name"), Some(&json!("Jules")));

    let mut update = profile("Jules");
    update.insert("vehicle".into(), json!("bike"));
    system.riders.create_or_update_rider("rider-9", update).await.unwrap();

    let refreshed = system.riders.get_rider("rider-9").await.unwrap().unwrap();
    // createdAt survives the merge arm; lastUpdate moves forward.
    assert_eq!(refreshed.created_at, created.created_at);
    assert!(refreshed.last_update > created.last_update);
    assert_eq!(refreshed.profile.get("vehicle"), Some(&json!("bike")));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn concurrent_registrations_yield_one_rider() {
    let system = TrackingSystem::new();

    let mut tasks = Vec::new();
    for n in 0..6 {
        let riders = system.riders.clone();
        tasks.push(tokio::spawn(async move {
            riders.create_or_update_rider("rider-9", profile(&format!("attempt-{n}"))).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let all = system.riders.get_all_riders().await.unwrap();
    assert_eq!(all.len(), 1);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn location_updates_touch_location_and_last_update_only() {
    let system = TrackingSystem::new();
    system.riders.create_or_update_rider("rider-9", profile("Jules")).await.unwrap();

    let point = GeoPoint { lat: 1.3, lng: 36.8 };
    system.riders.update_location("rider-9", point).await.unwrap();

    let rider = system.riders.get_rider("rider-9").await.unwrap().unwrap();
    assert_eq!(rider.location, Some(point));
    assert_eq!(rider.profile.get("name"), Some(&json!("Jules")));

    // Unknown riders are not silently created by a location push.
    assert!(matches!(
        system.riders.update_location("rider-404", point).await,
        Err(RiderError::NotFound(_))
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn authorization_is_case_insensitive() {
    let system = TrackingSystem::new();

    system.access.authorize("Rider.Nine@Example.com", Some("Rider Nine")).await.unwrap();

    assert!(system.access.is_authorized("rider.nine@example.com").await);
    assert!(system.access.is_authorized("RIDER.NINE@EXAMPLE.COM").await);
    assert!(!system.access.is_authorized("someone.else@example.com").await);

    let listed = system.access.authorized_riders().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].email, "rider.nine@example.com");
    assert_eq!(listed[0].name, "Rider Nine");
    assert!(!listed[0].created_at.is_empty());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn double_authorization_is_rejected_any_casing() {
    let system = TrackingSystem::new();

    system.access.authorize("jules@example.com", None).await.unwrap();
    let second = system.access.authorize("JULES@example.com", None).await;
    assert!(matches!(second, Err(AccessError::AlreadyAuthorized(email)) if email == "jules@example.com"));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn revoking_unknown_email_fails() {
    let system = TrackingSystem::new();

    let result = system.access.revoke("ghost@example.com").await;
    assert!(matches!(result, Err(AccessError::NotAuthorized(_))));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn revoke_removes_access() {
    let system = TrackingSystem::new();

    system.access.authorize("jules@example.com", None).await.unwrap();
    assert!(system.access.is_authorized("jules@example.com").await);

    system.access.revoke("Jules@Example.com").await.unwrap();
    assert!(!system.access.is_authorized("jules@example.com").await);
    assert!(system.access.authorized_riders().await.is_empty());

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn authorization_fails_closed() {
    // No backend at all: checks answer false, never error.
    let gate = AccessService::unconfigured();
    assert!(!gate.is_authorized("jules@example.com").await);
    assert!(gate.authorized_riders().await.is_empty());
    assert!(matches!(
        gate.authorize("jules@example.com", None).await,
        Err(AccessError::BackendUnavailable)
    ));

    // Configured backend, blank email.
    let system = TrackingSystem::new();
    assert!(!system.access.is_authorized("").await);
    assert!(!system.access.is_authorized("   ").await);
    system.shutdown().await.unwrap();

    // Store dead mid-session: the query errors and the check degrades to
    // false instead of surfacing it.
    let (store, client) = delivery_tracking::store::DocumentStore::new(4);
    let handle = tokio::spawn(store.run());
    handle.abort();
    let _ = handle.await;
    let gate = AccessService::new(client);
    assert!(!gate.is_authorized("jules@example.com").await);
}

#[tokio::test]
async fn unconfigured_services_degrade() {
    let orders = delivery_tracking::orders::OrderService::unconfigured();
    assert!(orders.get_all_orders().await.unwrap().is_empty());
    assert!(orders.get_order("doc_1").await.unwrap().is_none());
    assert!(orders.get_customer_orders("0711").await.unwrap().is_empty());
    assert!(matches!(
        orders.create_order(Default::default()).await,
        Err(delivery_tracking::orders::OrderError::BackendUnavailable)
    ));

    let riders = RiderService::unconfigured();
    assert!(riders.get_all_riders().await.unwrap().is_empty());
    assert!(riders.get_rider("rider-9").await.unwrap().is_none());
    assert!(matches!(
        riders.update_location("rider-9", GeoPoint { lat: 0.0, lng: 0.0 }).await,
        Err(RiderError::BackendUnavailable)
    ));
}
