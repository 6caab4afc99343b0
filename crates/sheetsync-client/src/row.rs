use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Opaque identifier the record service assigns to a stored row.
///
/// Only ever used to address deletes. The service may send it as a JSON
/// string or number; both become the same textual id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => RecordId(s),
            Raw::Number(n) => RecordId(n.to_string()),
        })
    }
}

/// One spreadsheet row as the view sees it: column-ordered string cells plus
/// the hidden record id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    record_id: RecordId,
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new(record_id: RecordId, cells: Vec<(String, String)>) -> Self {
        Self { record_id, cells }
    }

    /// Builds a row from a decoded mapping, coercing every value to text.
    pub fn from_object(record_id: RecordId, object: Map<String, Value>) -> Self {
        let cells = object
            .into_iter()
            .map(|(column, value)| (column, coerce_cell(value)))
            .collect();
        Self { record_id, cells }
    }

    pub fn record_id(&self) -> &RecordId {
        &self.record_id
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(_, value)| value.as_str())
    }

    pub fn cells(&self) -> &[(String, String)] {
        &self.cells
    }
}

/// String form of a cell value. Type distinctions are erased here and never
/// recovered.
pub fn coerce_cell(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                return n.to_string();
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
                Some(f) => f.to_string(),
                None => n.to_string(),
            }
        }
        other @ (Value::Array(_) | Value::Object(_)) => other.to_string(),
    }
}
