//! Authorization-list entry for the rider dashboard.

use serde::{Deserialize, Serialize};

/// One authorized rider email.
///
/// `created_at` is an ISO-8601 string rather than a store timestamp: the
/// admin screen renders it without a live store connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedRider {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_at: String,
}
