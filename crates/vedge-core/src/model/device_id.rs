// ── Remote identifiers ──
//
// Standalone chassis number their ports and filters; clusters hand out
// opaque UUID strings. `DeviceId` carries either, and which one is valid
// is decided by the schema variant the record was read under.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use vedge_api::Schema;

/// Identifier of a port or filter on the device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceId {
    /// Integer index (standalone).
    Index(u64),
    /// Opaque string UUID (clustered).
    Uuid(String),
}

impl DeviceId {
    /// Read an identifier from a JSON value under the given schema.
    ///
    /// Standalone ids must be non-negative integers (numeric strings are
    /// tolerated); clustered ids must be non-empty strings. Anything else is
    /// not an identifier for this schema.
    pub fn from_value(schema: Schema, value: &Value) -> Option<Self> {
        match (schema, value) {
            (Schema::Standalone, Value::Number(n)) => n.as_u64().map(Self::Index),
            (Schema::Standalone, Value::String(s)) => s.trim().parse().ok().map(Self::Index),
            (Schema::Clustered, Value::String(s)) if !s.is_empty() => Some(Self::Uuid(s.clone())),
            _ => None,
        }
    }

    /// Read a list of identifiers, skipping entries that do not fit the schema.
    pub fn list_from_value(schema: Schema, value: Option<&Value>) -> Vec<Self> {
        match value {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| Self::from_value(schema, v))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// JSON representation for request bodies.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Index(i) => Value::from(*i),
            Self::Uuid(s) => Value::from(s.as_str()),
        }
    }

    /// String form used as a path key.
    pub fn as_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Uuid(s) => write!(f, "{s}"),
        }
    }
}
