//! # Rider Directory
//!
//! Owns rider record upsert, lookup, and the live location feed consumed by
//! the tracking map. Rider ids are supplied by the caller (an auth identity)
//! and double as document ids, which is what makes the atomic store upsert
//! possible: there is no separate "find my document" step, and two dashboards
//! racing to register the same rider converge on a single document.

pub mod error;

pub use error::RiderError;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::model::{GeoPoint, Rider};
use crate::store::{document, Direction, DocSubscription, Fields, LiveFeed, StoreClient, WriteFields};

pub(crate) const RIDERS: &str = "riders";

/// Client-facing service for the `riders` collection.
#[derive(Debug, Clone)]
pub struct RiderService {
    backend: Option<StoreClient>,
}

impl RiderService {
    pub fn new(store: StoreClient) -> Self {
        Self { backend: Some(store) }
    }

    /// A service with no backend; see
    /// [`OrderService::unconfigured`](crate::orders::OrderService::unconfigured)
    /// for the degradation rules.
    pub fn unconfigured() -> Self {
        Self { backend: None }
    }

    fn store(&self) -> Result<&StoreClient, RiderError> {
        self.backend.as_ref().ok_or(RiderError::BackendUnavailable)
    }

    /// Registers a rider or refreshes an existing record.
    ///
    /// Applied as one atomic store operation: a new id inserts the profile
    /// with `createdAt` and `lastUpdate`, an existing id merges the profile
    /// and refreshes `lastUpdate` only.
    #[instrument(skip(self, profile))]
    pub async fn create_or_update_rider(
        &self,
        rider_id: &str,
        profile: Fields,
    ) -> Result<(), RiderError> {
        let store = self.store()?;
        let insert = WriteFields::new()
            .with_fields(profile.clone())
            .server_timestamp("createdAt")
            .server_timestamp("lastUpdate");
        let merge = WriteFields::new()
            .with_fields(profile)
            .server_timestamp("lastUpdate");
        store
            .upsert(RIDERS, rider_id, insert, merge)
            .await
            .map_err(RiderError::store)?;
        info!(rider_id, "Rider upserted");
        Ok(())
    }

    /// Pushes a fresh location; patches `location` and `lastUpdate` only.
    #[instrument(skip(self, location))]
    pub async fn update_location(&self, rider_id: &str, location: GeoPoint) -> Result<(), RiderError> {
        let store = self.store()?;
        let fields = WriteFields::new()
            .set("location", serde_json::to_value(location)?)
            .server_timestamp("lastUpdate");
        store.merge(RIDERS, rider_id, fields).await.map_err(RiderError::store)
    }

    pub async fn get_rider(&self, rider_id: &str) -> Result<Option<Rider>, RiderError> {
        let Some(store) = &self.backend else { return Ok(None) };
        let Some(doc) = store.get(RIDERS, rider_id).await.map_err(RiderError::store)? else {
            return Ok(None);
        };
        Ok(Some(doc.decode()?))
    }

    /// Every registered rider, oldest registration first.
    pub async fn get_all_riders(&self) -> Result<Vec<Rider>, RiderError> {
        let Some(store) = &self.backend else { return Ok(Vec::new()) };
        let docs = store
            .query_all_ordered(RIDERS, "createdAt", Direction::Ascending)
            .await
            .map_err(RiderError::store)?;
        Ok(document::decode_all(docs, "rider"))
    }

    /// Live feed of one rider's location only, decoupling the tracking map
    /// from the full rider record shape.
    pub async fn subscribe_location(&self, rider_id: &str) -> RiderLocationFeed {
        let Some(store) = &self.backend else { return RiderLocationFeed { inner: None } };
        match store.subscribe_doc(RIDERS, rider_id).await {
            Ok(sub) => RiderLocationFeed { inner: Some(sub) },
            Err(error) => {
                warn!(rider_id, %error, "Rider subscription failed");
                RiderLocationFeed { inner: None }
            }
        }
    }
}

/// Live feed of a rider's location. Items are `None` while the rider has no
/// location or if the document vanishes.
#[derive(Debug)]
pub struct RiderLocationFeed {
    inner: Option<DocSubscription>,
}

#[async_trait]
impl LiveFeed for RiderLocationFeed {
    type Item = Option<GeoPoint>;

    async fn recv(&mut self) -> Option<Self::Item> {
        let sub = self.inner.as_mut()?;
        let doc = sub.recv().await?;
        let location = doc.and_then(|doc| {
            let raw = doc.fields.get("location").cloned()?;
            match serde_json::from_value::<Option<GeoPoint>>(raw) {
                Ok(point) => point,
                Err(error) => {
                    warn!(id = %doc.id, %error, "Undecodable rider location");
                    None
                }
            }
        });
        Some(location)
    }
}

impl RiderLocationFeed {
    pub fn cancel(self) {}
}
