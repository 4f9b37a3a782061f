//! Domain record type: one row of team-operations data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::datetime::normalize_date_key;

/// A heterogeneous row (meeting, training request, absence, to-do, time entry).
///
/// Records arrive from the backend as JSON objects. Accessors never fail: a
/// field with an unexpected shape is reported as absent so a single bad field
/// cannot break an export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainRecord(Map<String, Value>);

impl DomainRecord {
    /// Create an empty record
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style field setter
    #[must_use]
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// Raw field access
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Scalar field rendered as text.
    ///
    /// Strings are returned as-is, numbers and booleans are formatted.
    /// `null`, arrays and objects count as absent.
    pub fn text(&self, field: &str) -> Option<String> {
        self.0.get(field).and_then(scalar_text)
    }

    /// Identifier list held by `field`.
    ///
    /// A single scalar is treated as a one-element list. Non-scalar list
    /// elements are skipped.
    pub fn ids(&self, field: &str) -> Vec<String> {
        match self.0.get(field) {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(value) => scalar_text(value)
                .filter(|s| !s.is_empty())
                .into_iter()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Calendar date key (`YYYY-MM-DD`) held by `field`, if any.
    pub fn date_key(&self, field: &str) -> Option<String> {
        self.text(field)
            .map(|raw| normalize_date_key(&raw).to_string())
            .filter(|key| !key.is_empty())
    }

    /// Whether `field` equals `id` or is a list containing it
    pub fn references(&self, field: &str, id: &str) -> bool {
        self.ids(field).iter().any(|candidate| candidate == id)
    }
}

impl From<Map<String, Value>> for DomainRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
