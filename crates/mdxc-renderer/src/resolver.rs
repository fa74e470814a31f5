//! Tag to component resolution.
//!
//! Resolution order:
//!
//! 1. `wrapper` always resolves to the passthrough component.
//! 2. The parent-qualified binding `parent.tag`, when the element has a parent.
//! 3. The plain binding `tag`.
//! 4. An intrinsic HTML element (`span`, `details`) renders as itself.
//! 5. Otherwise the tag is unbound and a [`Diagnostic`] is returned; the
//!    renderer applies its fallback policy.

use std::sync::Arc;

use crate::component::{ComponentRef, HtmlElement, component, passthrough};
use crate::diagnostic::Diagnostic;
use crate::table::BindingTable;
use crate::tag::{BindingKey, Tag};

/// Outcome of resolving a tag.
#[derive(Clone, Debug)]
pub enum Resolution {
    /// Component to invoke.
    Component(ComponentRef),
    /// No binding exists; render a placeholder.
    Unbound(Diagnostic),
}

impl Resolution {
    /// The resolved component, if any.
    #[must_use]
    pub fn component(&self) -> Option<&ComponentRef> {
        match self {
            Self::Component(c) => Some(c),
            Self::Unbound(_) => None,
        }
    }

    /// Whether resolution fell back.
    #[must_use]
    pub fn is_unbound(&self) -> bool {
        matches!(self, Self::Unbound(_))
    }
}

/// Resolve `tag` against `table` without parent context.
///
/// # Example
///
/// ```
/// use mdxc_renderer::{Resolution, Tag, default_table, resolve};
///
/// assert!(matches!(resolve(&Tag::Paragraph, default_table()), Resolution::Component(_)));
/// assert!(resolve(&Tag::new("FbInternalOnly"), default_table()).is_unbound());
/// ```
#[must_use]
pub fn resolve(tag: &Tag, table: &BindingTable) -> Resolution {
    resolve_in(None, tag, table)
}

/// Resolve `tag` nested in an element tagged `parent`.
///
/// A `parent.tag` binding takes precedence over the plain `tag` binding.
#[must_use]
pub fn resolve_in(parent: Option<&Tag>, tag: &Tag, table: &BindingTable) -> Resolution {
    if tag.is_wrapper() {
        return Resolution::Component(passthrough());
    }

    let qualified = parent.and_then(|parent| {
        table.get(&BindingKey {
            parent: Some(parent.clone()),
            tag: tag.clone(),
        })
    });

    match qualified.or_else(|| table.get_tag(tag)) {
        Some(bound) => Resolution::Component(Arc::clone(bound)),
        None => match tag.html_element() {
            Some(element) => Resolution::Component(component(HtmlElement::new(element))),
            None => Resolution::Unbound(Diagnostic::unbound(tag.as_str())),
        },
    }
}
