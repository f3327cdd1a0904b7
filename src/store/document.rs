//! # Documents & Write Payloads
//!
//! A [`Document`] is a schema-flexible record: an opaque store-assigned id
//! plus a JSON object of fields. Typed domain records live at the service
//! boundary and are produced by [`Document::decode`], which injects the id
//! into the field map before deserializing, matching the shape the UI
//! collaborators already consume.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::store::timestamp::TimestampClock;

/// The raw field map of a document.
pub type Fields = serde_json::Map<String, Value>;

/// A stored record: opaque id plus its current fields.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// Deserializes the document into a typed record, with the id injected as
    /// an `"id"` field.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let mut object = self.fields.clone();
        object.insert("id".to_string(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(object))
    }
}

/// Decodes a batch of documents, logging and skipping any that fail.
///
/// List reads prefer degrading to a shorter result over failing the whole
/// query; a single malformed record must not blank an order history screen.
pub(crate) fn decode_all<T: DeserializeOwned>(docs: Vec<Document>, record: &str) -> Vec<T> {
    docs.iter()
        .filter_map(|doc| match doc.decode() {
            Ok(item) => Some(item),
            Err(error) => {
                warn!(record, id = %doc.id, %error, "Skipping undecodable document");
                None
            }
        })
        .collect()
}

/// A single value in a write payload.
///
/// `ServerTimestamp` is a sentinel resolved by the store against its monotonic
/// clock at apply time; callers never stamp time from their own clock.
#[derive(Debug, Clone)]
pub enum WriteValue {
    Set(Value),
    ServerTimestamp,
}

/// An ordered write payload for `create`, `merge`, and `upsert`.
///
/// Entries apply in insertion order, so a later entry for the same field wins.
/// Fields not named here are left untouched by a merge.
#[derive(Debug, Clone, Default)]
pub struct WriteFields {
    entries: Vec<(String, WriteValue)>,
}

impl WriteFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field to a concrete value.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push((field.into(), WriteValue::Set(value.into())));
        self
    }

    /// Marks a field to receive the store's timestamp at apply time.
    pub fn server_timestamp(mut self, field: impl Into<String>) -> Self {
        self.entries.push((field.into(), WriteValue::ServerTimestamp));
        self
    }

    /// Appends a bag of caller-supplied fields as concrete values.
    pub fn with_fields(mut self, fields: Fields) -> Self {
        for (field, value) in fields {
            self.entries.push((field, WriteValue::Set(value)));
        }
        self
    }

    /// Resolves sentinels against the store clock, producing the final field
    /// map. Runs inside the store actor, never on the caller side.
    pub(crate) fn resolve(self, clock: &mut TimestampClock) -> Fields {
        let mut fields = Fields::new();
        for (field, value) in self.entries {
            let value = match value {
                WriteValue::Set(value) => value,
                WriteValue::ServerTimestamp => clock.now().as_value(),
            };
            fields.insert(field, value);
        }
        fields
    }
}
