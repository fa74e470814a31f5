//! Binding tables and override merging.
//!
//! A [`BindingTable`] maps [`BindingKey`]s to components and is immutable:
//! [`BindingTable::merge`] always produces a new table and leaves its input
//! untouched. Entries are shared by reference, so a merge costs one map copy
//! of `Arc` handles and never clones a component.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::component::{ComponentRef, same_component};
use crate::tag::{BindingKey, Tag};

/// Caller-supplied partial mapping from binding keys to components.
///
/// # Example
///
/// ```
/// use mdxc_renderer::{ComponentRegistry, HtmlElement, component};
///
/// let registry = ComponentRegistry::new()
///     .with("FbInternalOnly", component(HtmlElement::new("aside")))
///     .with("li.inlineCode", component(HtmlElement::new("kbd")));
/// assert_eq!(registry.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    entries: HashMap<BindingKey, ComponentRef>,
}

impl ComponentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding, replacing any previous one for the same key.
    #[must_use]
    pub fn with(mut self, key: impl Into<BindingKey>, component: ComponentRef) -> Self {
        self.insert(key, component);
        self
    }

    /// Add a binding, returning the previous one for the same key.
    pub fn insert(
        &mut self,
        key: impl Into<BindingKey>,
        component: ComponentRef,
    ) -> Option<ComponentRef> {
        self.entries.insert(key.into(), component)
    }

    #[must_use]
    pub fn get(&self, key: &BindingKey) -> Option<&ComponentRef> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the bindings in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&BindingKey, &ComponentRef)> {
        self.entries.iter()
    }

    /// Combine two registries; entries in `other` win.
    #[must_use]
    pub fn merged_with(&self, other: &ComponentRegistry) -> ComponentRegistry {
        let mut entries = self.entries.clone();
        entries.extend(
            other
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), Arc::clone(v))),
        );
        Self { entries }
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(sorted_keys(&self.entries)).finish()
    }
}

impl<K: Into<BindingKey>> FromIterator<(K, ComponentRef)> for ComponentRegistry {
    fn from_iter<I: IntoIterator<Item = (K, ComponentRef)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Function computing overrides from the table they will be merged onto.
pub type DeriveFn = dyn Fn(&BindingTable) -> ComponentRegistry + Send + Sync;

/// Overrides applied when a scope is pushed.
///
/// Either a static registry, or a function of the current table so overrides
/// can be expressed relative to existing bindings ("keep everything but wrap
/// `link`").
#[derive(Clone)]
pub enum Overrides {
    Static(ComponentRegistry),
    Derived(Arc<DeriveFn>),
}

impl Overrides {
    /// Overrides that change nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::Static(ComponentRegistry::new())
    }

    /// Overrides computed from the base table at merge time.
    ///
    /// # Example
    ///
    /// ```
    /// use mdxc_renderer::{BindingKey, ComponentRegistry, Overrides, Tag, default_table, component_fn};
    /// use std::sync::Arc;
    ///
    /// // Wrap the current link component in a <span>.
    /// let overrides = Overrides::derived(|base| {
    ///     let inner = Arc::clone(base.get_tag(&Tag::Link).unwrap());
    ///     ComponentRegistry::new().with(
    ///         "a",
    ///         component_fn(move |attrs, children| {
    ///             mdxc_renderer::Output::element("span", [inner.render(attrs, children)])
    ///         }),
    ///     )
    /// });
    ///
    /// let table = default_table().merge(&overrides);
    /// assert!(table.contains(&BindingKey::plain(Tag::Link)));
    /// ```
    #[must_use]
    pub fn derived<F>(f: F) -> Self
    where
        F: Fn(&BindingTable) -> ComponentRegistry + Send + Sync + 'static,
    {
        Self::Derived(Arc::new(f))
    }

    /// Resolve to a concrete registry against `base`.
    #[must_use]
    pub fn resolve(&self, base: &BindingTable) -> ComponentRegistry {
        match self {
            Self::Static(registry) => registry.clone(),
            Self::Derived(f) => f(base),
        }
    }
}

impl Default for Overrides {
    fn default() -> Self {
        Self::none()
    }
}

impl From<ComponentRegistry> for Overrides {
    fn from(registry: ComponentRegistry) -> Self {
        Self::Static(registry)
    }
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(registry) => f.debug_tuple("Static").field(registry).finish(),
            Self::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

/// Immutable mapping from binding keys to components.
///
/// Cloning is cheap: clones share storage.
///
/// # Example
///
/// ```
/// use mdxc_renderer::{BindingKey, ComponentRegistry, HtmlElement, Overrides, Tag, component, default_table};
///
/// let base = default_table();
/// let table = base.merge(&Overrides::from(
///     ComponentRegistry::new().with("p", component(HtmlElement::new("section"))),
/// ));
///
/// assert_eq!(table.len(), base.len());
/// assert!(!mdxc_renderer::same_component(
///     table.get_tag(&Tag::Paragraph).unwrap(),
///     base.get_tag(&Tag::Paragraph).unwrap(),
/// ));
/// ```
#[derive(Clone, Default)]
pub struct BindingTable {
    entries: Arc<HashMap<BindingKey, ComponentRef>>,
}

impl BindingTable {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a binding.
    #[must_use]
    pub fn get(&self, key: &BindingKey) -> Option<&ComponentRef> {
        self.entries.get(key)
    }

    /// Look up the plain (unqualified) binding of a tag.
    #[must_use]
    pub fn get_tag(&self, tag: &Tag) -> Option<&ComponentRef> {
        self.get(&BindingKey::plain(tag.clone()))
    }

    #[must_use]
    pub fn contains(&self, key: &BindingKey) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Binding keys sorted by their display form.
    #[must_use]
    pub fn keys(&self) -> Vec<&BindingKey> {
        sorted_keys(&self.entries)
    }

    /// Whether both tables share the same storage.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.entries, &b.entries)
    }

    /// Produce a new table with `overrides` applied on top of `self`.
    ///
    /// Derived overrides are invoked with `self`. Every resolved key replaces
    /// the existing entry or, for keys with no binding yet, is added. `self` is
    /// never modified. When nothing is overridden, the result shares `self`'s
    /// storage.
    #[must_use]
    pub fn merge(&self, overrides: &Overrides) -> BindingTable {
        let resolved = overrides.resolve(self);
        if resolved.is_empty() {
            return self.clone();
        }

        let mut entries = HashMap::with_capacity(self.entries.len() + resolved.len());
        entries.extend(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), Arc::clone(v))),
        );
        entries.extend(resolved.entries);

        Self {
            entries: Arc::new(entries),
        }
    }
}

impl PartialEq for BindingTable {
    /// Tables are equal when they bind the same keys to the same components.
    fn eq(&self, other: &Self) -> bool {
        if Self::ptr_eq(self, other) {
            return true;
        }
        self.entries.len() == other.entries.len()
            && self.entries.iter().all(|(key, component)| {
                other
                    .entries
                    .get(key)
                    .is_some_and(|c| same_component(c, component))
            })
    }
}

impl fmt::Debug for BindingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                sorted_keys(&self.entries)
                    .into_iter()
                    .map(|k| (k.to_string(), self.entries[k].name().to_owned())),
            )
            .finish()
    }
}

impl From<ComponentRegistry> for BindingTable {
    fn from(registry: ComponentRegistry) -> Self {
        Self {
            entries: Arc::new(registry.entries),
        }
    }
}

fn sorted_keys(entries: &HashMap<BindingKey, ComponentRef>) -> Vec<&BindingKey> {
    let mut keys: Vec<_> = entries.keys().collect();
    keys.sort_by_cached_key(|k| k.to_string());
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{HtmlElement, component};

    fn el(name: &str) -> ComponentRef {
        component(HtmlElement::new(name))
    }

    fn base() -> BindingTable {
        BindingTable::from(
            ComponentRegistry::new()
                .with("p", el("p"))
                .with("inlineCode", el("code")),
        )
    }

    #[test]
    fn test_merge_leaves_base_unchanged() {
        let base = base();
        let snapshot = base.clone();
        let before = base.get_tag(&Tag::Paragraph).map(Arc::clone).unwrap();

        let _merged = base.merge(&Overrides::from(
            ComponentRegistry::new().with("p", el("section")),
        ));

        assert_eq!(base, snapshot);
        assert!(BindingTable::ptr_eq(&base, &snapshot));
        assert!(same_component(
            base.get_tag(&Tag::Paragraph).unwrap(),
            &before
        ));
    }

    #[test]
    fn test_override_wins() {
        let section = el("section");
        let merged = base().merge(&Overrides::from(
            ComponentRegistry::new().with("p", Arc::clone(&section)),
        ));
        assert!(same_component(
            merged.get_tag(&Tag::Paragraph).unwrap(),
            &section
        ));
    }

    #[test]
    fn test_defaults_preserved_with_same_identity() {
        let base = base();
        let merged = base.merge(&Overrides::from(
            ComponentRegistry::new().with("p", el("section")),
        ));
        assert!(same_component(
            merged.get_tag(&Tag::InlineCode).unwrap(),
            base.get_tag(&Tag::InlineCode).unwrap()
        ));
    }

    #[test]
    fn test_unknown_keys_are_added() {
        let merged = base().merge(&Overrides::from(
            ComponentRegistry::new().with("Note", el("aside")),
        ));
        assert_eq!(merged.len(), 3);
        assert!(merged.contains(&BindingKey::plain("Note")));
    }

    #[test]
    fn test_empty_overrides_share_storage() {
        let base = base();
        let merged = base.merge(&Overrides::none());
        assert!(BindingTable::ptr_eq(&base, &merged));
    }

    #[test]
    fn test_derived_overrides_see_base() {
        let base = base();
        let overrides = Overrides::derived(|table| {
            // Rebind `strong` to whatever `p` currently is.
            let p = Arc::clone(table.get_tag(&Tag::Paragraph).unwrap());
            ComponentRegistry::new().with("strong", p)
        });

        let merged = base.merge(&overrides);
        assert!(same_component(
            merged.get_tag(&Tag::Strong).unwrap(),
            base.get_tag(&Tag::Paragraph).unwrap()
        ));
    }

    #[test]
    fn test_later_merge_wins() {
        let first = el("first");
        let second = el("second");
        let merged = base()
            .merge(&Overrides::from(
                ComponentRegistry::new().with("p", Arc::clone(&first)),
            ))
            .merge(&Overrides::from(
                ComponentRegistry::new().with("p", Arc::clone(&second)),
            ));
        assert!(same_component(
            merged.get_tag(&Tag::Paragraph).unwrap(),
            &second
        ));
    }

    #[test]
    fn test_merge_is_associative_for_static_overrides() {
        let b = ComponentRegistry::new()
            .with("p", el("b-p"))
            .with("Note", el("b-note"));
        let c = ComponentRegistry::new()
            .with("p", el("c-p"))
            .with("li.inlineCode", el("c-kbd"));

        let base = base();
        let stepwise = base
            .merge(&Overrides::from(b.clone()))
            .merge(&Overrides::from(c.clone()));
        let combined = base.merge(&Overrides::from(b.merged_with(&c)));

        assert_eq!(stepwise, combined);
        assert_ne!(stepwise, base);
    }

    #[test]
    fn test_keys_sorted() {
        let table = base();
        let keys: Vec<String> = table.keys().iter().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["inlineCode", "p"]);
    }

    #[test]
    fn test_equality_is_by_identity() {
        let a = BindingTable::from(ComponentRegistry::new().with("p", el("p")));
        let b = BindingTable::from(ComponentRegistry::new().with("p", el("p")));
        assert_ne!(a, b);
    }

    #[test]
    fn test_registry_from_iter() {
        let registry: ComponentRegistry = [("p", el("p")), ("a", el("a"))].into_iter().collect();
        assert_eq!(registry.len(), 2);
        assert!(registry.get(&BindingKey::plain(Tag::Link)).is_some());
    }

    static_assertions::assert_impl_all!(BindingTable: Send, Sync);
    static_assertions::assert_impl_all!(ComponentRegistry: Send, Sync);
    static_assertions::assert_impl_all!(Overrides: Send, Sync);
}
