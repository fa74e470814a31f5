//! Tree renderer.
//!
//! Walks a [`Node`] tree depth-first in document order, resolves each element
//! against the current scope of a [`ContextStore`], and invokes the resolved
//! component with the element's attributes and rendered children.

use crate::component::passthrough;
use crate::context::{ContextStore, ScopeError};
use crate::diagnostic::Diagnostic;
use crate::node::{Attributes, Element, Node};
use crate::output::Output;
use crate::resolver::{Resolution, resolve_in};
use crate::table::Overrides;
use crate::tag::Tag;

/// What an element with no binding renders as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Render the placeholder element around the element's children.
    #[default]
    Passthrough,
    /// Render nothing for the element and its subtree.
    Omit,
}

/// Configuration for [`Renderer`].
#[derive(Clone, Debug)]
pub struct RendererConfig {
    /// Fallback for unbound tags.
    ///
    /// Default: [`FallbackPolicy::Passthrough`]
    pub fallback: FallbackPolicy,
    /// Element used for the passthrough placeholder.
    ///
    /// Default: `div`
    pub placeholder_element: String,
    /// Maximum element nesting depth.
    ///
    /// Default: 256
    pub max_depth: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RendererConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fallback: FallbackPolicy::Passthrough,
            placeholder_element: "div".to_owned(),
            max_depth: 256,
        }
    }

    /// Set the fallback policy for unbound tags.
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Set the placeholder element.
    #[must_use]
    pub fn with_placeholder_element(mut self, element: impl Into<String>) -> Self {
        self.placeholder_element = element.into();
        self
    }

    /// Set the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Result of rendering a tree.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderResult {
    /// Rendered output.
    pub output: Output,
    /// Recoverable conditions, in document order.
    pub diagnostics: Vec<Diagnostic>,
}

impl RenderResult {
    /// Serialize the output to HTML.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.output.to_html()
    }

    #[must_use]
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Error that aborts a render.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Scopes were not popped in nesting order.
    #[error("scope discipline violation: {0}")]
    Scope(#[from] ScopeError),
}

/// Renders document trees.
///
/// A renderer holds only configuration and can be shared between threads;
/// each call owns its own [`ContextStore`].
///
/// # Example
///
/// ```
/// use mdxc_renderer::{Node, Overrides, Renderer};
///
/// let tree = Node::element("paragraph").with_children([
///     Node::text("Use "),
///     Node::element("inlineCode").with_child(Node::text("--flag")),
///     Node::text(" to disable."),
/// ]);
///
/// let result = Renderer::new().render_document(&tree, &Overrides::none()).unwrap();
/// assert_eq!(result.to_html(), "<p>Use <code>--flag</code> to disable.</p>");
/// assert!(result.diagnostics.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Create a renderer with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RendererConfig::default())
    }

    /// Create a renderer with custom configuration.
    #[must_use]
    pub fn with_config(config: RendererConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Render `node` under the current scope of `store`.
    ///
    /// Scopes declared by elements are pushed onto `store` for their subtree
    /// and popped before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Scope`] on a scope discipline violation.
    pub fn render(
        &self,
        node: &Node,
        store: &mut ContextStore,
    ) -> Result<RenderResult, RenderError> {
        let mut walk = Walk {
            config: &self.config,
            diagnostics: Vec::new(),
        };
        let output = walk.node(node, None, store, 0)?;
        Ok(RenderResult {
            output,
            diagnostics: walk.diagnostics,
        })
    }

    /// Render a top-level document.
    ///
    /// Establishes a scope of the default bindings merged with `registry`, and
    /// anchors the tree under the `wrapper` passthrough.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Scope`] on a scope discipline violation.
    pub fn render_document(
        &self,
        root: &Node,
        registry: &Overrides,
    ) -> Result<RenderResult, RenderError> {
        let mut store = ContextStore::new();
        let mut scope = store.scoped(registry);

        let mut result = self.render(root, &mut scope)?;
        if root.tag() != Some(&Tag::Wrapper) {
            let output = std::mem::replace(&mut result.output, Output::Empty);
            result.output = passthrough().render(&Attributes::new(), vec![output]);
        }
        scope.close()?;

        tracing::debug!(
            diagnostics = result.diagnostics.len(),
            "Rendered document"
        );
        Ok(result)
    }
}

/// State of one render call.
struct Walk<'c> {
    config: &'c RendererConfig,
    diagnostics: Vec<Diagnostic>,
}

impl Walk<'_> {
    fn node(
        &mut self,
        node: &Node,
        parent: Option<&Tag>,
        store: &mut ContextStore,
        depth: usize,
    ) -> Result<Output, RenderError> {
        let el = match node {
            Node::Text(text) => return Ok(Output::text(text.clone())),
            Node::Element(el) => el,
        };

        if depth >= self.config.max_depth {
            self.diagnostics
                .push(Diagnostic::depth_exceeded(el.tag().as_str(), self.config.max_depth));
            return Ok(Output::Empty);
        }

        match el.overrides() {
            Some(overrides) => {
                let mut scope = store.scoped(overrides);
                let output = self.element(el, parent, &mut scope, depth)?;
                scope.close()?;
                Ok(output)
            }
            None => self.element(el, parent, store, depth),
        }
    }

    fn element(
        &mut self,
        el: &Element,
        parent: Option<&Tag>,
        store: &mut ContextStore,
        depth: usize,
    ) -> Result<Output, RenderError> {
        let resolution = resolve_in(parent, el.tag(), store.current_table());

        let component = match resolution {
            Resolution::Component(component) => component,
            Resolution::Unbound(diagnostic) => {
                return self.fallback(el, diagnostic, store, depth);
            }
        };

        let children = self.children(el, store, depth)?;
        Ok(component.render(el.attributes(), children))
    }

    fn fallback(
        &mut self,
        el: &Element,
        diagnostic: Diagnostic,
        store: &mut ContextStore,
        depth: usize,
    ) -> Result<Output, RenderError> {
        if el.children().is_empty() {
            tracing::debug!(tag = %el.tag(), "Unbound element without content, rendering nothing");
            self.diagnostics.push(Diagnostic::malformed(el.tag().as_str()));
            return Ok(Output::Empty);
        }

        tracing::debug!(
            tag = %el.tag(),
            policy = ?self.config.fallback,
            "Component not provided, rendering fallback"
        );
        self.diagnostics.push(diagnostic);

        match self.config.fallback {
            FallbackPolicy::Passthrough => {
                let children = self.children(el, store, depth)?;
                Ok(Output::element_with(
                    self.config.placeholder_element.clone(),
                    el.attributes().clone(),
                    children,
                ))
            }
            FallbackPolicy::Omit => Ok(Output::Empty),
        }
    }

    fn children(
        &mut self,
        el: &Element,
        store: &mut ContextStore,
        depth: usize,
    ) -> Result<Vec<Output>, RenderError> {
        // Top-level elements have no parent for qualified lookups.
        let parent = (!el.tag().is_wrapper()).then_some(el.tag());
        el.children()
            .iter()
            .map(|child| self.node(child, parent, store, depth + 1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::component::{HtmlElement, component, component_fn};
    use crate::diagnostic::DiagnosticKind;
    use crate::table::ComponentRegistry;

    fn registry(entries: &[(&str, &str)]) -> Overrides {
        entries
            .iter()
            .map(|(key, element)| (*key, component(HtmlElement::new(*element))))
            .collect::<ComponentRegistry>()
            .into()
    }

    #[test]
    fn test_text_node_unchanged() {
        let mut store = ContextStore::new();
        let result = Renderer::new()
            .render(&Node::text("a < b"), &mut store)
            .unwrap();
        assert_eq!(result.output, Output::text("a < b"));
    }

    #[test]
    fn test_children_in_document_order() {
        let tree = Node::element("ul").with_children([
            Node::element("li").with_child(Node::text("one")),
            Node::element("li").with_child(Node::text("two")),
            Node::element("li").with_child(Node::text("three")),
        ]);
        let result = Renderer::new()
            .render_document(&tree, &Overrides::none())
            .unwrap();
        assert_eq!(
            result.to_html(),
            "<ul><li>one</li><li>two</li><li>three</li></ul>"
        );
    }

    #[test]
    fn test_document_registry_overrides_defaults() {
        let tree = Node::element("p").with_child(Node::text("hi"));
        let result = Renderer::new()
            .render_document(&tree, &registry(&[("p", "section")]))
            .unwrap();
        assert_eq!(result.to_html(), "<section>hi</section>");
    }

    #[test]
    fn test_document_is_wrapped_in_passthrough() {
        let tree = Node::element("p").with_child(Node::text("hi"));
        let result = Renderer::new()
            .render_document(&tree, &Overrides::none())
            .unwrap();
        assert_eq!(
            result.output,
            Output::fragment([Output::element("p", [Output::text("hi")])])
        );
    }

    #[test]
    fn test_explicit_wrapper_root_not_double_wrapped() {
        let tree = Node::element("wrapper").with_child(Node::text("hi"));
        let result = Renderer::new()
            .render_document(&tree, &Overrides::none())
            .unwrap();
        assert_eq!(result.output, Output::fragment([Output::text("hi")]));
    }

    #[test]
    fn test_unbound_tag_passthrough() {
        let tree = Node::element("FbInternalOnly")
            .with_attr("className", "internal")
            .with_child(Node::text("hello"));
        let result = Renderer::new()
            .render_document(&tree, &Overrides::none())
            .unwrap();

        assert_eq!(result.to_html(), r#"<div class="internal">hello</div>"#);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(
            result.diagnostics[0].as_pair(),
            ("FbInternalOnly", "component not provided")
        );
    }

    #[test]
    fn test_intrinsic_elements_render_as_themselves() {
        let tree = Node::element("p").with_children([
            Node::element("span").with_child(Node::text("a")),
            Node::element("div").with_child(Node::text("b")),
            Node::element("sup"),
        ]);
        let result = Renderer::new()
            .render_document(&tree, &Overrides::none())
            .unwrap();

        assert_eq!(
            result.to_html(),
            "<p><span>a</span><div>b</div><sup></sup></p>"
        );
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_unbound_tag_custom_placeholder() {
        let config = RendererConfig::new().with_placeholder_element("span");
        let tree = Node::element("Widget").with_child(Node::text("x"));
        let result = Renderer::with_config(config)
            .render_document(&tree, &Overrides::none())
            .unwrap();
        assert_eq!(result.to_html(), "<span>x</span>");
    }

    #[test]
    fn test_unbound_tag_omit_policy() {
        let config = RendererConfig::new().with_fallback(FallbackPolicy::Omit);
        let tree = Node::element("p").with_children([
            Node::text("before "),
            Node::element("FbInternalOnly").with_child(Node::text("secret")),
            Node::text("after"),
        ]);
        let result = Renderer::with_config(config)
            .render_document(&tree, &Overrides::none())
            .unwrap();

        assert_eq!(result.to_html(), "<p>before after</p>");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::UnboundTag);
    }

    #[test]
    fn test_malformed_node_renders_nothing() {
        let tree = Node::element("p").with_children([
            Node::text("a"),
            Node::element("Widget"),
            Node::text("b"),
        ]);
        let result = Renderer::new()
            .render_document(&tree, &Overrides::none())
            .unwrap();

        assert_eq!(result.to_html(), "<p>ab</p>");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::MalformedNode);
        assert_eq!(result.diagnostics[0].tag, "Widget");
    }

    #[test]
    fn test_bound_empty_element_is_not_malformed() {
        let tree = Node::element("p").with_child(Node::element("br"));
        let result = Renderer::new()
            .render_document(&tree, &Overrides::none())
            .unwrap();
        assert_eq!(result.to_html(), "<p><br></p>");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_nested_scope_applies_to_subtree_only() {
        let tree = Node::element("wrapper").with_children([
            Node::element("p").with_child(Node::text("outer")),
            Node::element("blockquote")
                .with_overrides(registry(&[("p", "aside")]))
                .with_child(Node::element("p").with_child(Node::text("inner"))),
            Node::element("p").with_child(Node::text("after")),
        ]);
        let result = Renderer::new()
            .render_document(&tree, &Overrides::none())
            .unwrap();

        assert_eq!(
            result.to_html(),
            "<p>outer</p><blockquote><aside>inner</aside></blockquote><p>after</p>"
        );
    }

    #[test]
    fn test_nested_scope_applies_to_declaring_element() {
        let tree = Node::element("p")
            .with_overrides(registry(&[("p", "section")]))
            .with_child(Node::text("x"));
        let result = Renderer::new()
            .render_document(&tree, &Overrides::none())
            .unwrap();
        assert_eq!(result.to_html(), "<section>x</section>");
    }

    #[test]
    fn test_deeper_scope_wins() {
        let tree = Node::element("div")
            .with_overrides(registry(&[("strong", "b")]))
            .with_child(
                Node::element("div")
                    .with_overrides(registry(&[("strong", "mark")]))
                    .with_child(Node::element("strong").with_child(Node::text("x"))),
            );
        let result = Renderer::new()
            .render_document(&tree, &Overrides::none())
            .unwrap();
        assert_eq!(result.to_html(), "<div><div><mark>x</mark></div></div>");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_render_leaves_store_balanced() {
        let tree = Node::element("div")
            .with_overrides(registry(&[("p", "aside")]))
            .with_child(Node::element("p").with_child(Node::text("x")));
        let mut store = ContextStore::new();
        let before = store.current_table().clone();

        Renderer::new().render(&tree, &mut store).unwrap();

        assert_eq!(store.depth(), 0);
        assert_eq!(store.current_table(), &before);
    }

    #[test]
    fn test_parent_qualified_binding() {
        let tree = Node::element("wrapper").with_children([
            Node::element("p").with_child(Node::element("inlineCode").with_child(Node::text("a"))),
            Node::element("ul").with_child(
                Node::element("li")
                    .with_child(Node::element("inlineCode").with_child(Node::text("b"))),
            ),
        ]);
        let result = Renderer::new()
            .render_document(&tree, &registry(&[("li.inlineCode", "kbd")]))
            .unwrap();
        assert_eq!(
            result.to_html(),
            "<p><code>a</code></p><ul><li><kbd>b</kbd></li></ul>"
        );
    }

    #[test]
    fn test_top_level_elements_have_no_parent() {
        // A `wrapper.p` key never matches: top-level elements are unqualified.
        let tree = Node::element("wrapper").with_child(Node::element("p").with_child(Node::text("x")));
        let result = Renderer::new()
            .render_document(&tree, &registry(&[("wrapper.p", "section")]))
            .unwrap();
        assert_eq!(result.to_html(), "<p>x</p>");
    }

    #[test]
    fn test_depth_limit() {
        let config = RendererConfig::new().with_max_depth(2);
        let tree = Node::element("div").with_child(
            Node::element("div").with_child(Node::element("div").with_child(Node::text("deep"))),
        );
        let result = Renderer::with_config(config)
            .render_document(&tree, &Overrides::none())
            .unwrap();

        assert_eq!(result.to_html(), "<div><div></div></div>");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].kind, DiagnosticKind::DepthExceeded);
    }

    #[test]
    fn test_component_receives_attributes_and_children() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let link = component_fn(move |attrs, children| {
            counter.fetch_add(children.len(), Ordering::SeqCst);
            let href = attrs.get("href").map(ToString::to_string).unwrap_or_default();
            Output::element("a", [Output::text(format!("{href}: ")), Output::fragment(children)])
        });

        let tree = Node::element("a")
            .with_attr("href", "/docs")
            .with_children([Node::text("Docs"), Node::text("!")]);
        let result = Renderer::new()
            .render_document(
                &tree,
                &ComponentRegistry::new().with("a", link).into(),
            )
            .unwrap();

        assert_eq!(result.to_html(), "<a>/docs: Docs!</a>");
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_render_is_deterministic() {
        let tree = Node::element("p").with_children([
            Node::text("x"),
            Node::element("Unknown").with_child(Node::text("y")),
            Node::element("Empty"),
        ]);
        let renderer = Renderer::new();
        let first = renderer.render_document(&tree, &Overrides::none()).unwrap();
        let second = renderer.render_document(&tree, &Overrides::none()).unwrap();
        assert_eq!(first, second);
    }

    static_assertions::assert_impl_all!(Renderer: Send, Sync);
}
