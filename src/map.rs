//! Ordered map type for mapping values.
//!
//! This module provides [`ValueMap`], a wrapper around [`IndexMap`] that keeps
//! entries in insertion order, and [`Key`], the key type of a mapping.
//!
//! ## Why IndexMap?
//!
//! - **Display order**: reports and the pretty printer walk keys in the order
//!   the caller inserted them
//! - **Order-free equality**: two maps with the same entries compare equal
//!   regardless of insertion order
//!
//! ## Keys
//!
//! Keys are stored as they were given and are never stringified. An integer
//! key `1` and a string key `"1"` are different keys and render differently in
//! paths (`root[1]` versus `root['1']`).
//!
//! ```rust
//! use serde_deepdiff::{Key, ValueMap, Value};
//!
//! let mut map = ValueMap::new();
//! map.insert("name", Value::from("Alice"));
//! map.insert(1, Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! assert!(map.contains_key(Key::Int(1)));
//! assert!(!map.contains_key("1"));
//! ```

use indexmap::IndexMap;
use std::fmt;

use crate::Value;

/// The key of a mapping entry.
///
/// `Attr` keys name attributes of an object-like value; they render as
/// `.name` in paths instead of `['name']`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Str(String),
    Int(i64),
    Attr(String),
}

impl Key {
    /// Creates an attribute key.
    #[must_use]
    pub fn attr(name: impl Into<String>) -> Self {
        Key::Attr(name.into())
    }

    /// Returns the key text for string and attribute keys.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Str(s) | Key::Attr(s) => Some(s),
            Key::Int(_) => None,
        }
    }

    /// Returns the integer for integer keys.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Key::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(s) | Key::Attr(s) => f.write_str(s),
            Key::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Str(value)
    }
}

impl From<&String> for Key {
    fn from(value: &String) -> Self {
        Key::Str(value.clone())
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Int(value as i64)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Int(value)
    }
}

impl From<u32> for Key {
    fn from(value: u32) -> Self {
        Key::Int(value as i64)
    }
}

impl From<&Key> for Key {
    fn from(value: &Key) -> Self {
        value.clone()
    }
}

/// An ordered map of keys to values.
///
/// A thin wrapper around [`IndexMap`]. Iteration follows insertion order;
/// equality ignores it.
///
/// # Examples
///
/// ```rust
/// use serde_deepdiff::{ValueMap, Value};
///
/// let mut a = ValueMap::new();
/// a.insert("first", Value::from(1));
/// a.insert("second", Value::from(2));
///
/// let b: ValueMap = vec![("second", Value::from(2)), ("first", Value::from(1))]
///     .into_iter()
///     .collect();
///
/// assert_eq!(a, b);
/// let keys: Vec<String> = a.keys().map(|k| k.to_string()).collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueMap(IndexMap<Key, Value>);

impl ValueMap {
    /// Creates an empty `ValueMap`.
    #[must_use]
    pub fn new() -> Self {
        ValueMap(IndexMap::new())
    }

    /// Creates an empty `ValueMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ValueMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned and
    /// the key keeps its original position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_deepdiff::{ValueMap, Value};
    ///
    /// let mut map = ValueMap::new();
    /// assert!(map.insert("key", Value::from(42)).is_none());
    /// assert!(map.insert("key", Value::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: impl Into<Key>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        self.0.get(&key.into())
    }

    /// Returns `true` if the map contains the key.
    #[must_use]
    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.0.contains_key(&key.into())
    }

    /// Returns the number of elements in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, Key, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, Key, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ValueMap {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for ValueMap {
    type Item = (Key, Value);
    type IntoIter = indexmap::map::IntoIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<Key>> FromIterator<(K, Value)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        ValueMap(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_and_string_keys_are_distinct() {
        let mut map = ValueMap::new();
        map.insert(1, Value::from("int"));
        map.insert("1", Value::from("str"));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(1).and_then(|v| v.as_str()), Some("int"));
        assert_eq!(map.get("1").and_then(|v| v.as_str()), Some("str"));
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut map = ValueMap::new();
        map.insert("a", Value::from(1));
        map.insert("b", Value::from(2));
        map.insert("a", Value::from(3));

        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec![Key::from("a"), Key::from("b")]);
        assert_eq!(map.get("a"), Some(&Value::from(3)));
    }

    #[test]
    fn test_attr_keys() {
        let key = Key::attr("name");
        assert_eq!(key.as_str(), Some("name"));
        assert_ne!(key, Key::from("name"));
        assert_eq!(Key::Int(4).as_int(), Some(4));
    }
}
