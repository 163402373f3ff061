//! Structural mapping from XML elements to JSON values
//!
//! Each element becomes one of:
//!
//! * a string, when it has no attributes and no child elements (its
//!   concatenated text, `""` when empty);
//! * an object holding `@name` keys for attributes, a `#text` key for
//!   non-empty text next to attributes, and one key per child tag name.
//!
//! A child tag seen once maps to a plain value; the second occurrence
//! promotes the key to an array for the rest of that element.

use std::str::FromStr;

use indexmap::IndexMap;

use crate::value::{Object, Value};
use crate::xml::model::{Document, Element};

/// Treatment of text before it reaches the output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Whitespace {
    /// Use concatenated text as-is, indentation included
    #[default]
    Preserve,
    /// Trim leading and trailing whitespace from concatenated text
    Trim,
}

/// Accepts `preserve` or `trim`, case-insensitively
impl FromStr for Whitespace {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "preserve" => Ok(Self::Preserve),
            "trim" => Ok(Self::Trim),
            _ => Err(()),
        }
    }
}

impl Whitespace {
    fn apply(self, text: String) -> String {
        match self {
            Self::Preserve => text,
            Self::Trim => {
                let trimmed = text.trim();
                if trimmed.len() == text.len() {
                    text
                } else {
                    trimmed.to_string()
                }
            }
        }
    }
}

/// Mapper options
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub whitespace: Whitespace,
    /// Prefix for attribute keys
    pub attribute_prefix: String,
    /// Key for text that sits next to attributes
    pub text_key: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            whitespace: Whitespace::Preserve,
            attribute_prefix: "@".to_string(),
            text_key: "#text".to_string(),
        }
    }
}

/// State of one object key while an element's children are merged
///
/// A missing key is the absent state; the first value makes it `Single`,
/// any further value makes it `Many`. There is no way back to `Single`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    Single(Value),
    Many(Vec<Value>),
}

impl Slot {
    /// Add another value under the same key
    pub fn push(&mut self, value: Value) {
        match self {
            Self::Many(values) => values.push(value),
            Self::Single(first) => {
                let first = std::mem::take(first);
                *self = Self::Many(vec![first, value]);
            }
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Single(value) => value,
            Self::Many(values) => Value::from(values),
        }
    }
}

/// Insertion-ordered accumulator for an element's object form
#[derive(Clone, Debug, Default)]
pub struct Fields {
    slots: IndexMap<String, Slot>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Assign `key`, replacing any previous value in place
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.slots.insert(key.into(), Slot::Single(value));
    }

    /// Merge a repeated-sibling value under `key`
    pub fn merge(&mut self, key: &str, value: Value) {
        match self.slots.get_mut(key) {
            Some(slot) => slot.push(value),
            None => {
                self.slots.insert(key.to_string(), Slot::Single(value));
            }
        }
    }

    pub fn slot(&self, key: &str) -> Option<&Slot> {
        self.slots.get(key)
    }

    pub fn into_object(self) -> Object {
        self.slots
            .into_iter()
            .map(|(key, slot)| (key, slot.into_value()))
            .collect()
    }
}

/// Map a whole document to `{ root_name: value }`
pub fn map_document(document: &Document, options: &Options) -> Value {
    let mut top = Object::with_capacity(1);
    top.insert(
        document.root.name.clone(),
        map_element(&document.root, options),
    );
    Value::Object(top)
}

/// Map a single element, recursively
pub fn map_element(element: &Element, options: &Options) -> Value {
    let text = options.whitespace.apply(element.text());
    let has_elements = element.elements().next().is_some();

    if element.attributes.is_empty() && !has_elements {
        return Value::String(text);
    }

    let mut fields = Fields::new();
    for (name, value) in &element.attributes {
        fields.set(
            format!("{}{name}", options.attribute_prefix),
            Value::String(value.clone()),
        );
    }

    if !element.attributes.is_empty() && !text.is_empty() {
        fields.set(options.text_key.clone(), Value::String(text));
    }

    for child in element.elements() {
        fields.merge(&child.name, map_element(child, options));
    }

    Value::Object(fields.into_object())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::model::Content;

    fn leaf(name: &str, text: &str) -> Element {
        let mut element = Element::new(name);
        if !text.is_empty() {
            element.children.push(Content::Text(text.to_string()));
        }
        element
    }

    fn with_children(name: &str, children: Vec<Element>) -> Element {
        let mut element = Element::new(name);
        element
            .children
            .extend(children.into_iter().map(Content::Element));
        element
    }

    fn object(entries: Vec<(&str, Value)>) -> Value {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn test_slot_promotion() {
        let mut slot = Slot::Single(Value::from("a"));
        slot.push(Value::from("b"));
        assert_eq!(
            slot,
            Slot::Many(vec![Value::from("a"), Value::from("b")])
        );
        slot.push(Value::from("c"));
        assert_eq!(
            slot.into_value(),
            Value::from(vec![Value::from("a"), Value::from("b"), Value::from("c")])
        );
    }

    #[test]
    fn test_single_slot_is_not_wrapped() {
        assert_eq!(Slot::Single(Value::from("a")).into_value(), Value::from("a"));
    }

    #[test]
    fn test_fields_merge_keeps_first_position() {
        let mut fields = Fields::new();
        fields.merge("a", Value::from("1"));
        fields.merge("b", Value::from("2"));
        fields.merge("a", Value::from("3"));

        assert!(matches!(fields.slot("a"), Some(Slot::Many(values)) if values.len() == 2));
        assert!(matches!(fields.slot("b"), Some(Slot::Single(_))));

        let obj = fields.into_object();
        let keys: Vec<_> = obj.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_leaf_is_empty_string() {
        let value = map_element(&Element::new("e"), &Options::default());
        assert_eq!(value, Value::from(""));
    }

    #[test]
    fn test_text_leaf_is_string() {
        let value = map_element(&leaf("e", "hi"), &Options::default());
        assert_eq!(value, Value::from("hi"));
    }

    #[test]
    fn test_attributes_only() {
        let mut element = Element::new("data");
        element
            .attributes
            .insert("id".to_string(), "123".to_string());
        let value = map_element(&element, &Options::default());
        assert_eq!(value, object(vec![("@id", Value::from("123"))]));
    }

    #[test]
    fn test_attributes_with_text() {
        let mut element = leaf("item", "Value2");
        element
            .attributes
            .insert("attr".to_string(), "test".to_string());
        let value = map_element(&element, &Options::default());
        assert_eq!(
            value,
            object(vec![
                ("@attr", Value::from("test")),
                ("#text", Value::from("Value2"))
            ])
        );
    }

    #[test]
    fn test_text_without_attributes_is_dropped_next_to_elements() {
        let mut element = with_children("a", vec![leaf("b", "x")]);
        element.children.push(Content::Text("tail".to_string()));
        let value = map_element(&element, &Options::default());
        assert_eq!(value, object(vec![("b", Value::from("x"))]));
    }

    #[test]
    fn test_whitespace_policy() {
        let mut element = with_children("a", vec![leaf("b", "x")]);
        element
            .attributes
            .insert("k".to_string(), "v".to_string());
        element.children.insert(0, Content::Text("\n  ".to_string()));
        element.children.push(Content::Text("\n".to_string()));

        let preserved = map_element(&element, &Options::default());
        assert_eq!(preserved.get("#text"), Some(&Value::from("\n  \n")));

        let options = Options {
            whitespace: Whitespace::Trim,
            ..Options::default()
        };
        let trimmed = map_element(&element, &options);
        assert_eq!(trimmed.get("#text"), None);
        assert_eq!(map_element(&leaf("t", "  x  "), &options), Value::from("x"));
    }

    #[test]
    fn test_whitespace_from_str() {
        assert_eq!("trim".parse(), Ok(Whitespace::Trim));
        assert_eq!("Preserve".parse(), Ok(Whitespace::Preserve));
        assert_eq!("squash".parse::<Whitespace>(), Err(()));
    }

    #[test]
    fn test_custom_keys() {
        let mut element = leaf("item", "body");
        element
            .attributes
            .insert("id".to_string(), "7".to_string());
        let options = Options {
            attribute_prefix: "_".to_string(),
            text_key: "$".to_string(),
            ..Options::default()
        };
        assert_eq!(
            map_element(&element, &options),
            object(vec![("_id", Value::from("7")), ("$", Value::from("body"))])
        );
    }

    #[test]
    fn test_map_document_wraps_root() {
        let root = with_children("root", vec![leaf("item", "1"), leaf("item", "2")]);
        let value = map_document(&Document { root }, &Options::default());
        assert_eq!(
            value,
            object(vec![(
                "root",
                object(vec![(
                    "item",
                    Value::from(vec![Value::from("1"), Value::from("2")])
                )])
            )])
        );
    }
}
