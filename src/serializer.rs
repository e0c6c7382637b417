//! Serialization layer. JSON via serde_json.
//!
//! Implement [`Serializer`] if the preference document needs a different
//! encoding than the built-in compact or pretty JSON.

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Converts mapping snapshots to/from bytes for persistence.
pub trait Serializer: Send + Sync {
    /// Encode a whole mapping to bytes.
    fn serialize(&self, data: &Map<String, Value>) -> Result<Vec<u8>>;

    /// Decode bytes back into a mapping. The top level must be an object.
    fn deserialize(&self, bytes: &[u8]) -> Result<Map<String, Value>>;
}

/// JSON serializer with optional pretty-printing.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON with indentation, easier to edit by hand.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, data: &Map<String, Value>) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(data)
        } else {
            serde_json::to_vec(data)
        };
        bytes.map_err(|e| Error::Serialize(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Map<String, Value>> {
        match serde_json::from_slice::<Value>(bytes)? {
            Value::Object(map) => Ok(map),
            // a bare `null` document is treated like an empty one
            Value::Null => Ok(Map::new()),
            other => Err(Error::Deserialize(format!(
                "expected a JSON object at the top level, found {}",
                kind(&other)
            ))),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
