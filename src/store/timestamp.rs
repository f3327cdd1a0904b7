//! # Server Timestamps
//!
//! Timestamps are assigned by the store at write time, never by the caller's
//! clock. The canonical wire shape is a one-field object, `{"millis": <i64>}`,
//! but documents migrated from an older schema may carry a raw number or a
//! numeric/ISO-8601 string in the same position. [`normalize_millis`] is the
//! single pure function that maps every historical shape to a millisecond
//! value at the storage boundary; business logic only ever sees [`Timestamp`].

use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A store-assigned instant, canonically `{"millis": <i64>}` on the wire.
///
/// Deserialization is total: any historical shape normalizes via
/// [`normalize_millis`], and anything unparseable becomes `0` (oldest), so a
/// record with a mangled timestamp sorts last instead of failing to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    millis: i64,
}

impl Timestamp {
    pub fn from_millis(millis: i64) -> Self {
        Self { millis }
    }

    pub fn millis(&self) -> i64 {
        self.millis
    }

    /// The canonical document representation of this timestamp.
    pub fn as_value(&self) -> Value {
        json!({ "millis": self.millis })
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("millis", &self.millis)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::from_millis(normalize_millis(&raw)))
    }
}

/// Versioned-read adapter for timestamp fields.
///
/// Accepted shapes, in order of age: the canonical `{"millis": n}` object, a
/// raw integer or float millisecond count, a numeric string, or an ISO-8601
/// string. Everything else, including null and a missing field, is `0`.
pub fn normalize_millis(value: &Value) -> i64 {
    match value {
        Value::Object(map) => map.get("millis").map(normalize_millis).unwrap_or(0),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
                .or_else(|| {
                    DateTime::parse_from_rfc3339(s)
                        .ok()
                        .map(|dt| dt.timestamp_millis())
                })
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// The store's monotonic server clock.
///
/// Tracks the last issued value so two writes within the same wall millisecond
/// (or across a clock step backwards) still receive strictly increasing
/// timestamps.
#[derive(Debug, Default)]
pub(crate) struct TimestampClock {
    last: i64,
}

impl TimestampClock {
    pub fn now(&mut self) -> Timestamp {
        let wall = Utc::now().timestamp_millis();
        self.last = wall.max(self.last + 1);
        Timestamp::from_millis(self.last)
    }
}
