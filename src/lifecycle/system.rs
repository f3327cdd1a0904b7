use tracing::{error, info};

use crate::access::AccessService;
use crate::orders::OrderService;
use crate::riders::RiderService;
use crate::store::DocumentStore;

/// The runtime orchestrator for the delivery-tracking subsystem.
///
/// Spawns the document store task and wires the three services to it. The
/// services are cheap to clone and share one store.
///
/// # Example
///
/// ```ignore
/// let system = TrackingSystem::new();
///
/// let order = system.orders.create_order(params).await?;
/// system.orders.assign_rider(&order.id, "rider-9").await?;
///
/// system.shutdown().await?;
/// ```
pub struct TrackingSystem {
    /// Order lifecycle: creation, transitions, assignment, history, feeds.
    pub orders: OrderService,

    /// Rider directory: upsert, lookup, live location feed.
    pub riders: RiderService,

    /// Rider-dashboard authorization list.
    pub access: AccessService,

    /// Handle of the running store task, awaited on shutdown.
    handle: tokio::task::JoinHandle<()>,
}

impl TrackingSystem {
    /// Starts the store with the default request-channel capacity.
    pub fn new() -> Self {
        Self::with_buffer(32)
    }

    pub fn with_buffer(buffer_size: usize) -> Self {
        let (store, client) = DocumentStore::new(buffer_size);
        let handle = tokio::spawn(store.run());

        Self {
            orders: OrderService::new(client.clone()),
            riders: RiderService::new(client.clone()),
            access: AccessService::new(client),
            handle,
        }
    }

    /// Gracefully shuts the system down.
    ///
    /// Drops the services, which closes the store's request channel; the
    /// store drains remaining requests and exits. Returns an error if the
    /// store task panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down tracking system");

        drop(self.orders);
        drop(self.riders);
        drop(self.access);

        if let Err(e) = self.handle.await {
            error!("Store task failed: {e:?}");
            return Err(format!("store task failed: {e:?}"));
        }

        info!("Tracking system shutdown complete");
        Ok(())
    }
}

impl Default for TrackingSystem {
    fn default() -> Self {
        Self::new()
    }
}
