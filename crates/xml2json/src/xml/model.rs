//! XML data model

use indexmap::IndexMap;

/// XML document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
}

/// XML element
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Element {
    /// Tag name, namespace prefix included verbatim
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Content>,
}

/// XML content node
///
/// CDATA sections arrive as `Text`; nothing distinguishes them once parsed.
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Concatenation of all text children in document order
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Content::Text(text) => Some(text.as_str()),
                Content::Element(_) => None,
            })
            .collect()
    }

    /// Child elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            Content::Element(element) => Some(element),
            Content::Text(_) => None,
        })
    }

    /// True if the element has no attributes and no element children
    pub fn is_leaf(&self) -> bool {
        self.attributes.is_empty()
            && self
                .children
                .iter()
                .all(|child| matches!(child, Content::Text(_)))
    }

    /// True if the element has neither attributes nor children
    pub fn is_empty_leaf(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        let mut element = Element::new("root");
        element.children.push(Content::Text("a".to_string()));
        element.children.push(Content::Element(Element::new("child")));
        element.children.push(Content::Text("b".to_string()));
        element
    }

    #[test]
    fn test_text_concatenates_in_order() {
        assert_eq!(sample().text(), "ab");
    }

    #[test]
    fn test_elements_skips_text() {
        let element = sample();
        let names: Vec<_> = element.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["child"]);
    }

    #[test]
    fn test_leaf_predicates() {
        let empty = Element::new("e");
        assert!(empty.is_leaf());
        assert!(empty.is_empty_leaf());

        let mut text_only = Element::new("t");
        text_only.children.push(Content::Text("x".to_string()));
        assert!(text_only.is_leaf());
        assert!(!text_only.is_empty_leaf());

        assert!(!sample().is_leaf());

        let mut with_attr = Element::new("a");
        with_attr.attributes.insert("id".to_string(), "1".to_string());
        assert!(!with_attr.is_leaf());
        assert!(!with_attr.is_empty_leaf());
    }
}
