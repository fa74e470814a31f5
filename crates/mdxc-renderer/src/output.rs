//! Rendered output tree and HTML serialization.

use std::fmt::Write;

use crate::node::{AttrValue, Attributes};

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Rendered output produced by components.
///
/// # Example
///
/// ```
/// use mdxc_renderer::Output;
///
/// let out = Output::element("p", [Output::text("a < b")]);
/// assert_eq!(out.to_html(), "<p>a &lt; b</p>");
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "type", rename_all = "lowercase")
)]
pub enum Output {
    /// Nothing.
    Empty,
    /// Text content.
    Text {
        /// Unescaped text.
        value: String,
    },
    /// Element with a name, attributes and children.
    Element {
        name: String,
        attributes: Attributes,
        children: Vec<Output>,
    },
    /// Sequence of siblings without an enclosing element.
    Fragment {
        children: Vec<Output>,
    },
}

impl Output {
    /// Create a text output.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// Create an element output without attributes.
    #[must_use]
    pub fn element(name: impl Into<String>, children: impl IntoIterator<Item = Output>) -> Self {
        Self::Element {
            name: name.into(),
            attributes: Attributes::new(),
            children: children.into_iter().collect(),
        }
    }

    /// Create an element output with attributes.
    #[must_use]
    pub fn element_with(
        name: impl Into<String>,
        attributes: Attributes,
        children: impl IntoIterator<Item = Output>,
    ) -> Self {
        Self::Element {
            name: name.into(),
            attributes,
            children: children.into_iter().collect(),
        }
    }

    /// Create a fragment.
    #[must_use]
    pub fn fragment(children: impl IntoIterator<Item = Output>) -> Self {
        Self::Fragment {
            children: children.into_iter().collect(),
        }
    }

    /// Whether this output renders nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Fragment { children } => children.iter().all(Self::is_empty),
            Self::Text { .. } | Self::Element { .. } => false,
        }
    }

    /// Concatenated text of all text leaves, in document order.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Empty => {}
            Self::Text { value } => out.push_str(value),
            Self::Element { children, .. } | Self::Fragment { children } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Serialize to HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(1024);
        self.write_html(&mut out);
        out
    }

    /// Serialize to HTML, appending to `out`.
    pub fn write_html(&self, out: &mut String) {
        match self {
            Self::Empty => {}
            Self::Text { value } => out.push_str(&escape_html(value)),
            Self::Fragment { children } => {
                for child in children {
                    child.write_html(out);
                }
            }
            Self::Element {
                name,
                attributes,
                children,
            } => {
                out.push('<');
                out.push_str(name);
                write_attributes(attributes, out);
                out.push('>');

                if VOID_ELEMENTS.contains(&name.as_str()) {
                    return;
                }

                for child in children {
                    child.write_html(out);
                }
                write!(out, "</{name}>").unwrap();
            }
        }
    }
}

fn write_attributes(attributes: &Attributes, out: &mut String) {
    for (key, value) in attributes {
        let name = html_attribute_name(key);
        match value {
            AttrValue::Flag(true) => write!(out, " {name}").unwrap(),
            AttrValue::Flag(false) => {}
            AttrValue::Text(s) => write!(out, r#" {name}="{}""#, escape_html(s)).unwrap(),
            AttrValue::Number(n) => write!(out, r#" {name}="{n}""#).unwrap(),
        }
    }
}

/// Map JSX-style attribute names to their HTML spelling.
fn html_attribute_name(key: &str) -> &str {
    match key {
        "className" => "class",
        "htmlFor" => "for",
        _ => key,
    }
}

/// Escape special HTML characters.
///
/// # Example
///
/// ```
/// use mdxc_renderer::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
/// ```
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(Output::text("<b>").to_html(), "&lt;b&gt;");
    }

    #[test]
    fn test_fragment_is_flattened() {
        let out = Output::fragment([Output::text("a"), Output::Empty, Output::text("b")]);
        assert_eq!(out.to_html(), "ab");
    }

    #[test]
    fn test_nested_elements() {
        let out = Output::element(
            "p",
            [
                Output::text("Use "),
                Output::element("code", [Output::text("--flag")]),
                Output::text(" to disable."),
            ],
        );
        assert_eq!(out.to_html(), "<p>Use <code>--flag</code> to disable.</p>");
    }

    #[test]
    fn test_attributes_sorted_and_escaped() {
        let mut attributes = Attributes::new();
        attributes.insert("title".to_owned(), AttrValue::from(r#"say "hi""#));
        attributes.insert("href".to_owned(), AttrValue::from("/a?b=1&c=2"));
        let out = Output::element_with("a", attributes, [Output::text("x")]);
        assert_eq!(
            out.to_html(),
            r#"<a href="/a?b=1&amp;c=2" title="say &quot;hi&quot;">x</a>"#
        );
    }

    #[test]
    fn test_jsx_attribute_names() {
        let mut attributes = Attributes::new();
        attributes.insert("className".to_owned(), AttrValue::from("note"));
        attributes.insert("htmlFor".to_owned(), AttrValue::from("field"));
        let out = Output::element_with("label", attributes, []);
        assert_eq!(out.to_html(), r#"<label class="note" for="field"></label>"#);
    }

    #[test]
    fn test_boolean_and_numeric_attributes() {
        let mut attributes = Attributes::new();
        attributes.insert("checked".to_owned(), AttrValue::Flag(true));
        attributes.insert("disabled".to_owned(), AttrValue::Flag(false));
        attributes.insert("width".to_owned(), AttrValue::Number(560.0));
        let out = Output::element_with("input", attributes, []);
        assert_eq!(out.to_html(), r#"<input checked width="560">"#);
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        assert_eq!(Output::element("br", []).to_html(), "<br>");
        assert_eq!(Output::element("hr", []).to_html(), "<hr>");
    }

    #[test]
    fn test_text_content() {
        let out = Output::element(
            "p",
            [
                Output::text("Use "),
                Output::element("code", [Output::text("--flag")]),
            ],
        );
        assert_eq!(out.text_content(), "Use --flag");
    }

    #[test]
    fn test_is_empty() {
        assert!(Output::Empty.is_empty());
        assert!(Output::fragment([Output::Empty]).is_empty());
        assert!(!Output::text("").is_empty());
        assert!(!Output::element("div", []).is_empty());
    }
}
