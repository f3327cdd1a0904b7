//! # Access Control Gate
//!
//! Gates rider-dashboard access by email against the `authorizedRiders`
//! collection. Emails are case-normalized on every path, so any casing a
//! rider signs in with matches the stored entry.
//!
//! The authorization check **fails closed**: it answers `false` on an empty
//! email, a missing backend, or any store failure, and never lets an error
//! escape past this boundary. The admin mutations, by contrast, surface
//! their failures as typed errors.

pub mod error;

pub use error::AccessError;

use chrono::Utc;
use futures::future::join_all;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::model::AuthorizedRider;
use crate::store::{document, Direction, Document, StoreClient, StoreError, WriteFields};

pub(crate) const AUTHORIZED_RIDERS: &str = "authorizedRiders";

/// Client-facing service for the rider authorization list.
#[derive(Debug, Clone)]
pub struct AccessService {
    backend: Option<StoreClient>,
}

impl AccessService {
    pub fn new(store: StoreClient) -> Self {
        Self { backend: Some(store) }
    }

    /// A service with no backend: authorization checks answer `false`, admin
    /// mutations fail with [`AccessError::BackendUnavailable`].
    pub fn unconfigured() -> Self {
        Self { backend: None }
    }

    fn store(&self) -> Result<&StoreClient, AccessError> {
        self.backend.as_ref().ok_or(AccessError::BackendUnavailable)
    }

    /// Whether `email` may access the rider dashboard. Never errors.
    #[instrument(skip(self, email))]
    pub async fn is_authorized(&self, email: &str) -> bool {
        let Some(store) = &self.backend else {
            debug!("Authorization check without a backend, denying");
            return false;
        };
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return false;
        }
        match self.matches(store, &email).await {
            Ok(matches) => {
                let authorized = !matches.is_empty();
                debug!(%email, authorized, count = matches.len(), "Authorization check");
                authorized
            }
            Err(error) => {
                warn!(%email, %error, "Authorization check failed, denying");
                false
            }
        }
    }

    /// The full authorization list, for administrative display. Degrades to
    /// empty on any failure.
    pub async fn authorized_riders(&self) -> Vec<AuthorizedRider> {
        let Some(store) = &self.backend else { return Vec::new() };
        match store
            .query_all_ordered(AUTHORIZED_RIDERS, "createdAt", Direction::Ascending)
            .await
        {
            Ok(docs) => document::decode_all(docs, "authorized rider"),
            Err(error) => {
                warn!(%error, "Listing authorized riders failed");
                Vec::new()
            }
        }
    }

    /// Adds `email` to the authorization list; returns the new document id.
    ///
    /// `name` defaults to the email itself. `createdAt` is written as an
    /// ISO-8601 string so the admin screen can render it offline.
    #[instrument(skip(self, email, name))]
    pub async fn authorize(&self, email: &str, name: Option<&str>) -> Result<String, AccessError> {
        let store = self.store()?;
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AccessError::EmptyEmail);
        }
        if !self.matches(store, &email).await?.is_empty() {
            return Err(AccessError::AlreadyAuthorized(email));
        }

        let fields = WriteFields::new()
            .set("email", email.clone())
            .set("name", name.unwrap_or(&email))
            .set("createdAt", Utc::now().to_rfc3339());
        let doc = store.create(AUTHORIZED_RIDERS, fields).await?;
        info!(%email, id = %doc.id, "Rider authorized");
        Ok(doc.id)
    }

    /// Removes `email` from the authorization list.
    ///
    /// Deletes every matching document concurrently; duplicates can exist
    /// from the pre-normalization era and must all go.
    #[instrument(skip(self, email))]
    pub async fn revoke(&self, email: &str) -> Result<(), AccessError> {
        let store = self.store()?;
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(AccessError::EmptyEmail);
        }
        let entries = self.matches(store, &email).await?;
        if entries.is_empty() {
            return Err(AccessError::NotAuthorized(email));
        }

        let deletions = entries
            .iter()
            .map(|doc| store.delete(AUTHORIZED_RIDERS, &doc.id));
        for result in join_all(deletions).await {
            result?;
        }
        info!(%email, removed = entries.len(), "Rider authorization revoked");
        Ok(())
    }

    async fn matches(&self, store: &StoreClient, email: &str) -> Result<Vec<Document>, StoreError> {
        store.query_eq(AUTHORIZED_RIDERS, "email", json!(email)).await
    }
}
