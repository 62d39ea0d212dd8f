//! Core value types for front matter fields
//!
//! The front matter subset only knows three shapes of value: a scalar string,
//! null, and a flat list of strings. Numbers and booleans stay strings.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;

/// A single front matter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Scalar string (quotes already stripped)
    Str(String),
    /// The literal `null`
    Null,
    /// Inline `[a, b]` or block `- item` list
    List(Vec<String>),
}

impl FieldValue {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    /// Create a list value
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to view as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Items of this value viewed as a list.
    ///
    /// Lists yield their items, a scalar is split on commas (the `tools: Read, Grep`
    /// style), and null yields nothing.
    pub fn items(&self) -> Vec<String> {
        match self {
            Self::List(items) => items.clone(),
            Self::Str(s) => s
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            Self::Null => Vec::new(),
        }
    }

    /// Whether the value counts as "present" for a required field.
    ///
    /// Null, the empty string and the empty list are all blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Str(s) => s.is_empty(),
            Self::Null => true,
            Self::List(items) => items.is_empty(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{}", s),
            Self::Null => write!(f, "null"),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Str(s) => serializer.serialize_str(s),
            Self::Null => serializer.serialize_unit(),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// Insertion-ordered mapping from field name to value.
///
/// Re-inserting an existing key replaces its value in place, so the key keeps
/// the position of its first assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Get a field by name
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Get a scalar field as a string slice
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_str)
    }

    /// Check if a field exists (even when null)
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Check if a field exists and is not blank
    pub fn has_value(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_blank())
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no fields
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over field names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for FieldMap {
    fn from_iter<T: IntoIterator<Item = (K, FieldValue)>>(iter: T) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_keeps_position() {
        let mut map = FieldMap::new();
        map.insert("a", FieldValue::string("1"));
        map.insert("b", FieldValue::string("2"));
        let prev = map.insert("a", FieldValue::Null);

        assert_eq!(prev, Some(FieldValue::string("1")));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(map.get("a").unwrap().is_null());
    }

    #[test]
    fn test_blank_values() {
        assert!(FieldValue::string("").is_blank());
        assert!(FieldValue::Null.is_blank());
        assert!(FieldValue::List(vec![]).is_blank());
        assert!(!FieldValue::string("x").is_blank());
        assert!(!FieldValue::list(["x"]).is_blank());
    }

    #[test]
    fn test_items_splits_scalar_on_commas() {
        let tools = FieldValue::string("Read, Grep ,Glob");
        assert_eq!(tools.items(), vec!["Read", "Grep", "Glob"]);
        assert!(FieldValue::Null.items().is_empty());
    }

    #[test]
    fn test_serialize_preserves_order() {
        let map: FieldMap = vec![
            ("zeta", FieldValue::string("last")),
            ("alpha", FieldValue::list(["a", "b"])),
            ("mid", FieldValue::Null),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"zeta":"last","alpha":["a","b"],"mid":null}"#);
    }
}
