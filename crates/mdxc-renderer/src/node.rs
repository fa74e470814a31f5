//! Document tree nodes.
//!
//! Nodes are produced by an upstream parsing/build layer and are immutable once
//! constructed: the builder methods consume `self`.

use std::collections::BTreeMap;
use std::fmt;

use crate::table::Overrides;
use crate::tag::Tag;

/// Attribute value attached to an element.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum AttrValue {
    /// String value, rendered as `key="value"`.
    Text(String),
    /// Boolean value, rendered as a bare attribute when `true`.
    Flag(bool),
    /// Numeric value.
    Number(f64),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for AttrValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

/// Element attributes, ordered by name for deterministic output.
pub type Attributes = BTreeMap<String, AttrValue>;

/// A node of the document tree.
///
/// # Example
///
/// ```
/// use mdxc_renderer::{Node, Tag};
///
/// let node = Node::element("paragraph")
///     .with_child(Node::text("Use "))
///     .with_child(Node::element("inlineCode").with_child(Node::text("--flag")));
///
/// assert_eq!(node.tag(), Some(&Tag::Paragraph));
/// assert_eq!(node.children().len(), 2);
/// ```
#[derive(Clone, Debug)]
pub enum Node {
    /// Leaf text payload, rendered unchanged.
    Text(String),
    /// Tagged element.
    Element(Element),
}

impl Node {
    /// Create a text leaf.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create an element with no attributes and no children.
    #[must_use]
    pub fn element(tag: impl Into<Tag>) -> Self {
        Self::Element(Element::new(tag))
    }

    /// Add an attribute. No-op on text nodes.
    #[must_use]
    pub fn with_attr(self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.map_element(|el| el.with_attr(name, value))
    }

    /// Append a child. No-op on text nodes.
    #[must_use]
    pub fn with_child(self, child: Node) -> Self {
        self.map_element(|el| el.with_child(child))
    }

    /// Append children. No-op on text nodes.
    #[must_use]
    pub fn with_children(self, children: impl IntoIterator<Item = Node>) -> Self {
        self.map_element(|el| el.with_children(children))
    }

    /// Declare component overrides for this element and its subtree.
    /// No-op on text nodes.
    #[must_use]
    pub fn with_overrides(self, overrides: impl Into<Overrides>) -> Self {
        self.map_element(|el| el.with_overrides(overrides))
    }

    /// Tag of the node, `None` for text.
    #[must_use]
    pub fn tag(&self) -> Option<&Tag> {
        match self {
            Self::Text(_) => None,
            Self::Element(el) => Some(&el.tag),
        }
    }

    /// Children of the node (always empty for text).
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Text(_) => &[],
            Self::Element(el) => &el.children,
        }
    }

    fn map_element(self, f: impl FnOnce(Element) -> Element) -> Self {
        match self {
            Self::Element(el) => Self::Element(f(el)),
            text @ Self::Text(_) => text,
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

/// A tagged element node.
#[derive(Clone, Debug)]
pub struct Element {
    tag: Tag,
    attributes: Attributes,
    children: Vec<Node>,
    overrides: Option<Overrides>,
}

impl Element {
    /// Create an element with no attributes and no children.
    #[must_use]
    pub fn new(tag: impl Into<Tag>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
            overrides: None,
        }
    }

    /// Add an attribute, replacing any previous value.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Replace all attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Append a child.
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Append children.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Declare component overrides for this element and its subtree.
    #[must_use]
    pub fn with_overrides(mut self, overrides: impl Into<Overrides>) -> Self {
        self.overrides = Some(overrides.into());
        self
    }

    #[must_use]
    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Overrides declared on this element, if any.
    #[must_use]
    pub fn overrides(&self) -> Option<&Overrides> {
        self.overrides.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_node_has_no_tag_or_children() {
        let node = Node::text("hello");
        assert_eq!(node.tag(), None);
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_builders_ignore_text_nodes() {
        let node = Node::text("hello")
            .with_attr("id", "x")
            .with_child(Node::text("ignored"));
        assert!(matches!(node, Node::Text(ref s) if s == "hello"));
    }

    #[test]
    fn test_element_builder() {
        let node = Node::element("a")
            .with_attr("href", "/docs")
            .with_children([Node::text("Docs"), Node::text("!")]);

        let Node::Element(el) = node else {
            panic!("expected element");
        };
        assert_eq!(el.tag(), &Tag::Link);
        assert_eq!(el.attributes().get("href"), Some(&AttrValue::from("/docs")));
        assert_eq!(el.children().len(), 2);
        assert!(el.overrides().is_none());
    }

    #[test]
    fn test_attr_value_display() {
        assert_eq!(AttrValue::from("x").to_string(), "x");
        assert_eq!(AttrValue::from(true).to_string(), "true");
        assert_eq!(AttrValue::from(2).to_string(), "2");
        assert_eq!(AttrValue::from(1.5).to_string(), "1.5");
    }
}
