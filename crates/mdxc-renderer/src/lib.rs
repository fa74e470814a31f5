//! Component resolution and rendering for document trees.
//!
//! A document is a tree of [`Node`]s. Each element carries a [`Tag`] that is
//! resolved to a [`Component`] through a [`BindingTable`]; the component turns
//! the element's attributes and rendered children into [`Output`].
//!
//! # Architecture
//!
//! - [`default_table`]: process-wide bindings for the built-in tags
//! - [`BindingTable::merge`]: derives a table from a base and an [`Overrides`]
//!   set, without copying components
//! - [`ContextStore`]: stack of scoped tables for one render
//! - [`resolve`] / [`resolve_in`]: tag lookup with the reserved `wrapper`
//!   passthrough and unbound-tag [`Diagnostic`]s
//! - [`Renderer`]: depth-first tree walk
//!
//! Unknown tags never abort a render: they produce a placeholder and a
//! diagnostic. Only a scope discipline violation returns an error.
//!
//! # Example
//!
//! ```
//! use mdxc_renderer::{ComponentRegistry, HtmlElement, Node, Renderer, component};
//!
//! let registry = ComponentRegistry::new()
//!     .with("Note", component(HtmlElement::new("aside")));
//!
//! let tree = Node::element("wrapper").with_children([
//!     Node::element("Note").with_child(Node::text("Careful")),
//!     Node::element("FbInternalOnly").with_child(Node::text("hello")),
//! ]);
//!
//! let result = Renderer::new().render_document(&tree, &registry.into()).unwrap();
//! assert_eq!(result.to_html(), "<aside>Careful</aside><div>hello</div>");
//! assert_eq!(result.diagnostics[0].to_string(), "FbInternalOnly: component not provided");
//! ```

mod component;
mod context;
mod defaults;
mod diagnostic;
mod node;
mod output;
mod renderer;
mod resolver;
mod table;
mod tag;

pub use component::{
    Component, ComponentRef, HtmlElement, Passthrough, component, component_fn, passthrough,
    same_component,
};
pub use context::{ContextStore, ScopeError, ScopeGuard, ScopeHandle};
pub use defaults::default_table;
pub use diagnostic::{COMPONENT_NOT_PROVIDED, Diagnostic, DiagnosticKind};
pub use node::{AttrValue, Attributes, Element, Node};
pub use output::{Output, escape_html};
pub use renderer::{FallbackPolicy, RenderError, RenderResult, Renderer, RendererConfig};
pub use resolver::{Resolution, resolve, resolve_in};
pub use table::{BindingTable, ComponentRegistry, DeriveFn, Overrides};
pub use tag::{BindingKey, EmptyKeyError, Tag};
