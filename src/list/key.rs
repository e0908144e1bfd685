//! Stable row keys
//!
//! A row's key is its configured key field, stringified. Rows without that
//! field fall back to `__idx_<N>` for their position in the current view;
//! such keys follow position, not identity, and do not survive reordering.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

const POSITIONAL_PREFIX: &str = "__idx_";

/// Selection identity of a list row
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowKey(String);

impl RowKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Fallback key for the row at `index` in the view
    pub fn positional(index: usize) -> Self {
        Self(format!("{POSITIONAL_PREFIX}{index}"))
    }

    pub fn is_positional(&self) -> bool {
        self.0.starts_with(POSITIONAL_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for RowKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Key carried by `item` itself, if any
///
/// Strings are used verbatim, other values through their JSON text, so
/// `{"id": 1}` and `{"id": "1"}` share the key `1`.
pub fn field_key(item: &Value, key_field: &str) -> Option<RowKey> {
    match item.get(key_field)? {
        Value::Null => None,
        Value::String(s) => Some(RowKey::new(s.as_str())),
        other => Some(RowKey::new(other.to_string())),
    }
}

/// Key of `item` shown at view position `index`
pub fn derive_key(item: &Value, key_field: &str, index: usize) -> RowKey {
    field_key(item, key_field).unwrap_or_else(|| RowKey::positional(index))
}

/// One entry of a derived view: the item and its key for this render pass
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    pub key: RowKey,
    pub item: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_and_string_keys_stringify_alike() {
        assert_eq!(derive_key(&json!({"id": 1}), "id", 0).as_str(), "1");
        assert_eq!(derive_key(&json!({"id": "1"}), "id", 0).as_str(), "1");
    }

    #[test]
    fn test_missing_or_null_key_falls_back_to_position() {
        let key = derive_key(&json!({"name": "A"}), "id", 3);
        assert_eq!(key.as_str(), "__idx_3");
        assert!(key.is_positional());
        assert_eq!(derive_key(&json!({"id": null}), "id", 0).as_str(), "__idx_0");
        assert_eq!(derive_key(&json!("plain"), "id", 1).as_str(), "__idx_1");
    }

    #[test]
    fn test_custom_key_field() {
        let item = json!({"id": 1, "slug": "alpha"});
        assert_eq!(derive_key(&item, "slug", 0).as_str(), "alpha");
    }
}
