//! JSON document loading.
//!
//! A document is a node tree plus the components it declares:
//!
//! ```json
//! {
//!   "components": { "Note": { "element": "aside", "class": "note" } },
//!   "root": {
//!     "tag": "wrapper",
//!     "children": [
//!       { "tag": "p", "children": ["Use ", { "tag": "inlineCode", "children": ["--flag"] }] },
//!       { "tag": "Note", "attributes": { "role": "note" }, "children": ["Careful"] }
//!     ]
//!   }
//! }
//! ```
//!
//! A string node is text. An element may declare its own `components`, which
//! apply to the element and its subtree.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mdxc_config::{AttributeValue, ComponentConfig};
use mdxc_renderer::{ComponentRegistry, Element, Node};
use serde::Deserialize;

use crate::components::{attr_value, build_registry};
use crate::error::CliError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    #[serde(default)]
    components: BTreeMap<String, ComponentConfig>,
    root: RawNode,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNode {
    Text(String),
    Element(RawElement),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawElement {
    tag: String,
    #[serde(default)]
    attributes: BTreeMap<String, AttributeValue>,
    #[serde(default)]
    children: Vec<RawNode>,
    components: Option<BTreeMap<String, ComponentConfig>>,
}

/// Loaded document.
#[derive(Debug)]
pub(crate) struct Document {
    /// Source path.
    pub(crate) path: PathBuf,
    /// Root node.
    pub(crate) root: Node,
    /// Components declared at the document level.
    pub(crate) components: ComponentRegistry,
}

impl Document {
    /// Read and parse a document file.
    pub(crate) fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::File {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse a document from JSON text.
    pub(crate) fn parse(content: &str, path: &Path) -> Result<Self, CliError> {
        let raw: RawDocument =
            serde_json::from_str(content).map_err(|source| CliError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            root: build_node(raw.root)?,
            components: build_registry(&raw.components)?,
        })
    }

}

/// File stem used to name the output file of the document at `path`.
pub(crate) fn output_stem(path: &Path) -> &str {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("document")
}

fn build_node(raw: RawNode) -> Result<Node, CliError> {
    let raw = match raw {
        RawNode::Text(text) => return Ok(Node::text(text)),
        RawNode::Element(el) => el,
    };

    let attributes = raw
        .attributes
        .iter()
        .map(|(name, value)| (name.clone(), attr_value(value)))
        .collect();
    let children = raw
        .children
        .into_iter()
        .map(build_node)
        .collect::<Result<Vec<_>, _>>()?;

    let mut element = Element::new(raw.tag)
        .with_attributes(attributes)
        .with_children(children);
    if let Some(components) = &raw.components {
        element = element.with_overrides(build_registry(components)?);
    }
    Ok(element.into())
}
