//! Renderable components.
//!
//! A component turns an element's attributes and its already-rendered children
//! into [`Output`]. Components are shared behind [`ComponentRef`] and compared by
//! reference identity, so a component keeps its identity through any number of
//! binding table merges.

use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::node::Attributes;
use crate::output::Output;

/// Renderer for one tag.
///
/// Components must be pure with respect to their inputs: rendering the same
/// attributes and children twice must produce equal output, and a component
/// must not reach into shared rendering state.
///
/// Closures with the matching signature implement this trait.
///
/// # Thread Safety
///
/// Components are `Send + Sync` so binding tables can be shared between
/// independent renders running in parallel.
///
/// # Example
///
/// ```
/// use mdxc_renderer::{Attributes, Component, Output};
///
/// struct Kbd;
///
/// impl Component for Kbd {
///     fn render(&self, _attributes: &Attributes, children: Vec<Output>) -> Output {
///         Output::element("kbd", children)
///     }
/// }
///
/// let out = Kbd.render(&Attributes::new(), vec![Output::text("Ctrl+C")]);
/// assert_eq!(out.to_html(), "<kbd>Ctrl+C</kbd>");
/// ```
pub trait Component: Send + Sync {
    /// Render the element.
    fn render(&self, attributes: &Attributes, children: Vec<Output>) -> Output;

    /// Name used in debug output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> Component for F
where
    F: Fn(&Attributes, Vec<Output>) -> Output + Send + Sync,
{
    fn render(&self, attributes: &Attributes, children: Vec<Output>) -> Output {
        self(attributes, children)
    }

    fn name(&self) -> &str {
        "closure"
    }
}

/// Shared handle to a component.
pub type ComponentRef = Arc<dyn Component>;

/// Wrap a component into a [`ComponentRef`].
#[must_use]
pub fn component<C: Component + 'static>(c: C) -> ComponentRef {
    Arc::new(c)
}

/// Wrap a closure into a [`ComponentRef`].
///
/// # Example
///
/// ```
/// use mdxc_renderer::{Attributes, Output, component_fn};
///
/// let note = component_fn(|_attrs, children| Output::element("aside", children));
/// let out = note.render(&Attributes::new(), vec![Output::text("Heads up")]);
/// assert_eq!(out.to_html(), "<aside>Heads up</aside>");
/// ```
#[must_use]
pub fn component_fn<F>(f: F) -> ComponentRef
where
    F: Fn(&Attributes, Vec<Output>) -> Output + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Intrinsic component rendering a plain HTML element.
///
/// Attributes and rendered children are forwarded unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HtmlElement {
    element: String,
}

impl HtmlElement {
    #[must_use]
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
        }
    }

    /// Element name this component emits.
    #[must_use]
    pub fn element(&self) -> &str {
        &self.element
    }
}

impl Component for HtmlElement {
    fn render(&self, attributes: &Attributes, children: Vec<Output>) -> Output {
        Output::element_with(self.element.clone(), attributes.clone(), children)
    }

    fn name(&self) -> &str {
        &self.element
    }
}

/// Identity component: forwards its children without an enclosing element.
///
/// Bound to the reserved `wrapper` tag, which anchors the top of every render.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passthrough;

impl Component for Passthrough {
    fn render(&self, _attributes: &Attributes, children: Vec<Output>) -> Output {
        Output::fragment(children)
    }

    fn name(&self) -> &str {
        "passthrough"
    }
}

static PASSTHROUGH: LazyLock<ComponentRef> = LazyLock::new(|| Arc::new(Passthrough));

/// The process-wide passthrough instance.
///
/// Every call returns a handle to the same component, so
/// `Arc::ptr_eq(&passthrough(), &passthrough())` holds.
#[must_use]
pub fn passthrough() -> ComponentRef {
    Arc::clone(&PASSTHROUGH)
}

/// Whether two component handles refer to the same component.
#[must_use]
pub fn same_component(a: &ComponentRef, b: &ComponentRef) -> bool {
    Arc::ptr_eq(a, b)
}

impl fmt::Debug for dyn Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({})", self.name())
    }
}
