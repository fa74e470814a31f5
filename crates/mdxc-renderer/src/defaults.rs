//! Process-wide default bindings.

use std::sync::LazyLock;

use crate::component::{HtmlElement, component, passthrough};
use crate::table::{BindingTable, ComponentRegistry};
use crate::tag::{BUILTIN_TAGS, BindingKey};

static DEFAULTS: LazyLock<BindingTable> = LazyLock::new(build_defaults);

/// The default binding table.
///
/// Built on first use and read-only afterwards. Every built-in tag is bound to
/// an [`HtmlElement`] for its element (`inlineCode` renders as `<code>`), and
/// `wrapper` is bound to the passthrough component.
///
/// # Example
///
/// ```
/// use mdxc_renderer::{Tag, default_table};
///
/// assert!(default_table().get_tag(&Tag::InlineCode).is_some());
/// assert!(default_table().get_tag(&Tag::new("FbInternalOnly")).is_none());
/// ```
#[must_use]
pub fn default_table() -> &'static BindingTable {
    &DEFAULTS
}

fn build_defaults() -> BindingTable {
    let mut registry = ComponentRegistry::new();
    for tag in BUILTIN_TAGS {
        let bound = match tag.html_element() {
            Some(element) => component(HtmlElement::new(element)),
            None => passthrough(),
        };
        registry.insert(BindingKey::plain(tag.clone()), bound);
    }
    BindingTable::from(registry)
}
