//! JSON value produced by the structural mapper
//!
//! XML carries no typed scalars, so the tree has only three shapes: string
//! leaves, arrays from repeated siblings, and insertion-ordered objects.

use std::ops::Deref;

use indexmap::map::{IntoIter, Iter, Keys};
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Array(Array),
    Object(Object),
}

/// The empty string, which is also what an empty element maps to
impl Default for Value {
    fn default() -> Self {
        Self::String(String::new())
    }
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        if let Self::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        if let Self::Array(arr) = self {
            Some(arr)
        } else {
            None
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        if let Self::Object(obj) = self {
            Some(obj)
        } else {
            None
        }
    }

    pub fn is_object(&self) -> bool {
        self.as_object().is_some()
    }

    /// Member lookup; `None` for strings, arrays and missing keys
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_object()?.get(key)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(Array(items))
    }
}

impl From<Array> for Value {
    fn from(arr: Array) -> Self {
        Self::Array(arr)
    }
}

impl From<Object> for Value {
    fn from(obj: Object) -> Self {
        Self::Object(obj)
    }
}

/// Object whose keys keep the position of their first insertion
///
/// Inserting an existing key replaces its value without moving it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Object(IndexMap<String, Value>);

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the replaced value, if any
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn keys(&self) -> Keys<'_, String, Value> {
        self.0.keys()
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Values of a promoted key, in document order
///
/// Read access goes through the slice (`len`, `get`, `iter`, indexing).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Array(Vec<Value>);

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.0.push(value.into());
    }
}

impl Deref for Array {
    type Target = [Value];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<Value>> for Array {
    fn from(items: Vec<Value>) -> Self {
        Self(items)
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::ser::{Serialize, Serializer};

    use super::{Array, Object, Value};

    impl Serialize for Value {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::String(s) => serializer.serialize_str(s),
                Self::Array(arr) => arr.serialize(serializer),
                Self::Object(obj) => obj.serialize(serializer),
            }
        }
    }

    impl Serialize for Array {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.iter())
        }
    }

    impl Serialize for Object {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_map(self.iter())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let s = Value::from("hello");
        assert_eq!(s.as_str(), Some("hello"));
        assert_eq!(s.as_array(), None);
        assert!(!s.is_object());

        let a = Value::from(vec![Value::from("x")]);
        assert_eq!(a.as_array().map(|arr| arr.len()), Some(1));

        let o = Value::from(Object::new());
        assert!(o.is_object());
        assert_eq!(o.as_str(), None);
    }

    #[test]
    fn test_default_is_empty_string() {
        assert_eq!(Value::default().as_str(), Some(""));
    }

    #[test]
    fn test_object_reinsert_keeps_position() {
        let mut obj = Object::new();
        obj.insert("first", "1");
        obj.insert("second", "2");
        let previous = obj.insert("first", "3");

        assert_eq!(previous, Some(Value::from("1")));
        let keys: Vec<_> = obj.keys().collect();
        assert_eq!(keys, vec!["first", "second"]);
        assert_eq!(obj.get("first"), Some(&Value::from("3")));
    }

    #[test]
    fn test_get_only_reads_objects() {
        let obj: Object = [("k".to_string(), Value::from("v"))].into_iter().collect();
        let value = Value::Object(obj);
        assert_eq!(value.get("k"), Some(&Value::from("v")));
        assert_eq!(value.get("missing"), None);
        assert_eq!(Value::from("s").get("k"), None);
        assert_eq!(Value::from(vec![value.clone()]).get("k"), None);
    }

    #[test]
    fn test_array_push_and_slice_access() {
        let mut arr = Array::new();
        assert!(arr.is_empty());
        arr.push("a");
        arr.push(Object::new());
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.first(), Some(&Value::from("a")));
        assert!(arr.get(1).is_some_and(Value::is_object));
        assert_eq!(arr.get(2), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_keeps_key_order() -> Result<(), serde_json::Error> {
        let mut obj = Object::new();
        obj.insert("z", "1");
        obj.insert("a", vec![Value::from("2"), Value::from("3")]);
        let json = serde_json::to_string(&Value::Object(obj))?;
        assert_eq!(json, r#"{"z":"1","a":["2","3"]}"#);
        Ok(())
    }
}
