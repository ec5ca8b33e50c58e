//! Response envelope returned by every platform endpoint

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `{meta, data}` wrapper used by every API response.
///
/// The envelope is passed through verbatim: `meta` and `data` keep whatever
/// the platform sent (`null` included), and any additional top-level keys are
/// preserved in `extra` so that serializing an envelope reproduces the
/// original document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub meta: Value,

    #[serde(default)]
    pub data: Value,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Envelope {
    /// Identifier of the asynchronous activity created by the request, if any.
    #[must_use]
    pub fn activity_id(&self) -> Option<&str> {
        self.meta.get("activity_id").and_then(Value::as_str)
    }

    /// Status reported inside `meta` (not the HTTP status code).
    #[must_use]
    pub fn meta_status(&self) -> Option<&Value> {
        self.meta.get("status")
    }

    /// The `data.errors` object populated by the platform on failures.
    #[must_use]
    pub fn errors(&self) -> Option<&Value> {
        self.data.get("errors")
    }

    /// True when the platform reported errors in `data`.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors().is_some()
    }

    /// Wrap a JSON document that is not an object as the envelope's `data`.
    #[must_use]
    pub fn from_data(data: Value) -> Self {
        Self { data, ..Self::default() }
    }

    /// Convert back into a plain JSON document.
    #[must_use]
    pub fn into_value(self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
