//! Typed tag identifiers and binding keys.
//!
//! Every element in a document tree carries a [`Tag`]. Well-known markdown
//! elements get their own variants; everything else (embedded widgets such as
//! `FbInternalOnly`) is a [`Tag::Custom`].

use std::fmt;
use std::str::FromStr;

/// Tag identifier of a document element.
///
/// Parsing accepts both the short element names (`p`, `a`, `ul`, `h2`) and
/// the long mdast-style aliases (`paragraph`, `link`, `list`). Display always
/// yields the short, canonical form.
///
/// # Example
///
/// ```
/// use mdxc_renderer::Tag;
///
/// assert_eq!(Tag::from("paragraph"), Tag::Paragraph);
/// assert_eq!(Tag::from("p"), Tag::Paragraph);
/// assert_eq!(Tag::from("h3"), Tag::Heading(3));
/// assert_eq!(Tag::from("FbInternalOnly").as_str(), "FbInternalOnly");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    /// Reserved root passthrough. Cannot be overridden.
    Wrapper,
    Paragraph,
    /// Heading with level 1 to 6.
    Heading(u8),
    InlineCode,
    Code,
    Pre,
    Link,
    List,
    OrderedList,
    ListItem,
    Strong,
    Emphasis,
    Delete,
    Blockquote,
    ThematicBreak,
    Break,
    Image,
    Table,
    TableHead,
    TableBody,
    TableRow,
    TableHeader,
    TableCell,
    /// Any tag without a dedicated variant.
    Custom(String),
}

/// Tags bound by the default binding table (everything except `Custom`).
pub(crate) const BUILTIN_TAGS: &[Tag] = &[
    Tag::Wrapper,
    Tag::Paragraph,
    Tag::Heading(1),
    Tag::Heading(2),
    Tag::Heading(3),
    Tag::Heading(4),
    Tag::Heading(5),
    Tag::Heading(6),
    Tag::InlineCode,
    Tag::Code,
    Tag::Pre,
    Tag::Link,
    Tag::List,
    Tag::OrderedList,
    Tag::ListItem,
    Tag::Strong,
    Tag::Emphasis,
    Tag::Delete,
    Tag::Blockquote,
    Tag::ThematicBreak,
    Tag::Break,
    Tag::Image,
    Tag::Table,
    Tag::TableHead,
    Tag::TableBody,
    Tag::TableRow,
    Tag::TableHeader,
    Tag::TableCell,
];

impl Tag {
    /// Parse a tag name.
    ///
    /// Unknown names become [`Tag::Custom`]; this never fails.
    #[must_use]
    pub fn new(name: &str) -> Self {
        match name {
            "wrapper" => Self::Wrapper,
            "p" | "paragraph" => Self::Paragraph,
            "inlineCode" => Self::InlineCode,
            "code" => Self::Code,
            "pre" => Self::Pre,
            "a" | "link" => Self::Link,
            "ul" | "list" => Self::List,
            "ol" | "orderedList" => Self::OrderedList,
            "li" | "listItem" => Self::ListItem,
            "strong" => Self::Strong,
            "em" | "emphasis" => Self::Emphasis,
            "del" | "delete" => Self::Delete,
            "blockquote" => Self::Blockquote,
            "hr" | "thematicBreak" => Self::ThematicBreak,
            "br" | "break" => Self::Break,
            "img" | "image" => Self::Image,
            "table" => Self::Table,
            "thead" => Self::TableHead,
            "tbody" => Self::TableBody,
            "tr" | "tableRow" => Self::TableRow,
            "th" => Self::TableHeader,
            "td" | "tableCell" => Self::TableCell,
            _ => parse_heading(name).unwrap_or_else(|| Self::Custom(name.to_owned())),
        }
    }

    /// Canonical name of the tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Wrapper => "wrapper",
            Self::Paragraph => "p",
            Self::Heading(level) => match level {
                1 => "h1",
                2 => "h2",
                3 => "h3",
                4 => "h4",
                5 => "h5",
                _ => "h6",
            },
            Self::InlineCode => "inlineCode",
            Self::Code => "code",
            Self::Pre => "pre",
            Self::Link => "a",
            Self::List => "ul",
            Self::OrderedList => "ol",
            Self::ListItem => "li",
            Self::Strong => "strong",
            Self::Emphasis => "em",
            Self::Delete => "del",
            Self::Blockquote => "blockquote",
            Self::ThematicBreak => "hr",
            Self::Break => "br",
            Self::Image => "img",
            Self::Table => "table",
            Self::TableHead => "thead",
            Self::TableBody => "tbody",
            Self::TableRow => "tr",
            Self::TableHeader => "th",
            Self::TableCell => "td",
            Self::Custom(name) => name,
        }
    }

    /// HTML element an intrinsic tag renders to.
    ///
    /// Custom tags starting with a lowercase ASCII letter (`div`, `span`,
    /// `details`) are intrinsic and render to themselves. Component-style
    /// custom tags (`FbInternalOnly`) and the wrapper have no element.
    #[must_use]
    pub fn html_element(&self) -> Option<&str> {
        match self {
            Self::Wrapper => None,
            Self::Custom(name) => name
                .starts_with(|c: char| c.is_ascii_lowercase())
                .then_some(name.as_str()),
            // Inline code has no element of its own.
            Self::InlineCode => Some("code"),
            other => Some(other.as_str()),
        }
    }

    /// Whether this is the reserved root passthrough tag.
    #[must_use]
    pub fn is_wrapper(&self) -> bool {
        matches!(self, Self::Wrapper)
    }
}

fn parse_heading(name: &str) -> Option<Tag> {
    let level = name.strip_prefix('h')?.parse::<u8>().ok()?;
    (1..=6).contains(&level).then_some(Tag::Heading(level))
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of a binding table entry.
///
/// A plain key binds a tag everywhere. A parent-qualified key (`li.inlineCode`)
/// binds the tag only inside elements with the given parent tag, and takes
/// precedence over the plain key there.
///
/// # Example
///
/// ```
/// use mdxc_renderer::{BindingKey, Tag};
///
/// let key: BindingKey = "li.inlineCode".parse().unwrap();
/// assert_eq!(key.parent, Some(Tag::ListItem));
/// assert_eq!(key.tag, Tag::InlineCode);
/// assert_eq!(key.to_string(), "li.inlineCode");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingKey {
    /// Enclosing element tag, if qualified.
    pub parent: Option<Tag>,
    /// Bound tag.
    pub tag: Tag,
}

impl BindingKey {
    /// Key binding `tag` in every position.
    #[must_use]
    pub fn plain(tag: impl Into<Tag>) -> Self {
        Self {
            parent: None,
            tag: tag.into(),
        }
    }

    /// Key binding `tag` only when nested directly in `parent`.
    #[must_use]
    pub fn qualified(parent: impl Into<Tag>, tag: impl Into<Tag>) -> Self {
        Self {
            parent: Some(parent.into()),
            tag: tag.into(),
        }
    }

    /// Whether the key targets the reserved wrapper tag.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        self.parent.is_none() && self.tag.is_wrapper()
    }
}

/// Error returned when a binding key string is empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("binding key cannot be empty")]
pub struct EmptyKeyError;

impl FromStr for BindingKey {
    type Err = EmptyKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmptyKeyError);
        }
        match s.split_once('.') {
            Some((parent, tag)) if !parent.is_empty() && !tag.is_empty() => {
                Ok(Self::qualified(parent, tag))
            }
            _ => Ok(Self::plain(s)),
        }
    }
}

impl From<Tag> for BindingKey {
    fn from(tag: Tag) -> Self {
        Self::plain(tag)
    }
}

impl From<&str> for BindingKey {
    /// Parse a key, treating the empty string as a custom tag named `""`.
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| Self::plain(Tag::Custom(String::new())))
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{parent}.{}", self.tag),
            None => write!(f, "{}", self.tag),
        }
    }
}
