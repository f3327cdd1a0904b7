//! Rider record.

use serde::{Deserialize, Serialize};

use crate::model::GeoPoint;
use crate::store::{Fields, Timestamp};

/// A delivery rider as stored.
///
/// The id is caller-supplied (an auth identity), and doubles as the document
/// id in the riders collection. Beyond the tracked fields, a rider document
/// carries whatever profile fields the dashboard pushed on upsert; those
/// round-trip untouched through `profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rider {
    pub id: String,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub last_update: Timestamp,
    #[serde(default)]
    pub created_at: Timestamp,
    #[serde(flatten)]
    pub profile: Fields,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn profile_fields_flatten() {
        let rider: Rider = serde_json::from_value(json!({
            "id": "rider-9",
            "location": { "lat": 1.0, "lng": 2.0 },
            "lastUpdate": { "millis": 10 },
            "name": "Jules",
            "vehicle": "bike"
        }))
        .unwrap();
        assert_eq!(rider.location, Some(GeoPoint { lat: 1.0, lng: 2.0 }));
        assert_eq!(rider.profile.get("vehicle"), Some(&json!("bike")));
        assert_eq!(rider.profile.get("name"), Some(&json!("Jules")));
        assert!(rider.profile.get("lastUpdate").is_none());
    }
}
