//! Default Table: fallback values for preferences the user never set.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Read-only source of fallback values.
pub trait Defaults: Send + Sync {
    /// The registered default for `key`, or `None` if there is none.
    fn get(&self, key: &str) -> Option<Value>;
}

/// A table with nothing registered. Every unset key is a missing default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDefaults;

impl Defaults for NoDefaults {
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }
}

/// Owned default table, filled in once at startup.
///
/// ```rust
/// use json_prefs::DefaultTable;
/// use serde_json::json;
///
/// let defaults = DefaultTable::new()
///     .with("theme", "light")
///     .with("zoom-level", 1.0)
///     .with("launch-on-startup", json!(false));
/// assert_eq!(defaults.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefaultTable {
    values: HashMap<String, Value>,
}

impl DefaultTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the default for `key`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Number of registered defaults.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for DefaultTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Defaults for DefaultTable {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }
}

impl Defaults for HashMap<String, Value> {
    fn get(&self, key: &str) -> Option<Value> {
        HashMap::get(self, key).cloned()
    }
}

impl Defaults for BTreeMap<String, Value> {
    fn get(&self, key: &str) -> Option<Value> {
        BTreeMap::get(self, key).cloned()
    }
}

impl Defaults for Map<String, Value> {
    fn get(&self, key: &str) -> Option<Value> {
        Map::get(self, key).cloned()
    }
}
