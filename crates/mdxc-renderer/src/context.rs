//! Context store: the stack of binding scopes for one render.
//!
//! Scopes nest like parentheses. [`ContextStore::push_scope`] derives a new
//! table from the current one, [`ContextStore::pop_scope`] restores the
//! previous one and rejects handles that are not on top of the stack.
//! [`ContextStore::scoped`] returns a guard that pops on every exit path.

use std::ops::{Deref, DerefMut};

use crate::defaults::default_table;
use crate::table::{BindingTable, Overrides};

/// Identifies a pushed scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScopeHandle {
    id: u64,
    depth: usize,
}

impl ScopeHandle {
    /// Stack depth of the scope (1 for the first pushed scope).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Scope discipline violation.
///
/// Always a defect in the caller's traversal, never a content problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    /// The handle is live but other scopes were pushed after it.
    #[error("scope {depth} popped out of order: {above} newer scope(s) still active")]
    OutOfOrder {
        /// Depth of the offending handle.
        depth: usize,
        /// Number of scopes above it.
        above: usize,
    },
    /// The handle was already popped or belongs to another store.
    #[error("scope {depth} is not active (already popped or foreign handle)")]
    Stale {
        /// Depth of the offending handle.
        depth: usize,
    },
}

struct Frame {
    id: u64,
    table: BindingTable,
}

/// Stack of binding scopes owned by a single render.
///
/// The store is not shared between renders; independent renders each create
/// their own and may run in parallel.
///
/// # Example
///
/// ```
/// use mdxc_renderer::{BindingTable, ComponentRegistry, ContextStore, HtmlElement, Overrides, component};
///
/// let mut store = ContextStore::new();
/// let before = store.current_table().clone();
///
/// let overrides = Overrides::from(
///     ComponentRegistry::new().with("p", component(HtmlElement::new("section"))),
/// );
/// let handle = store.push_scope(&overrides);
/// assert_ne!(store.current_table(), &before);
///
/// store.pop_scope(handle).unwrap();
/// assert_eq!(store.current_table(), &before);
/// ```
pub struct ContextStore {
    root: BindingTable,
    frames: Vec<Frame>,
    next_id: u64,
}

impl Default for ContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStore {
    /// Create a store rooted at the default binding table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root(default_table().clone())
    }

    /// Create a store rooted at a custom table.
    #[must_use]
    pub fn with_root(root: BindingTable) -> Self {
        Self {
            root,
            frames: Vec::new(),
            next_id: 0,
        }
    }

    /// Effective table: the top scope's, or the root table when no scope is
    /// active.
    #[must_use]
    pub fn current_table(&self) -> &BindingTable {
        self.frames.last().map_or(&self.root, |frame| &frame.table)
    }

    /// Number of active scopes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Push a scope whose table is the current table merged with `overrides`.
    pub fn push_scope(&mut self, overrides: &Overrides) -> ScopeHandle {
        let table = self.current_table().merge(overrides);
        let id = self.next_id;
        self.next_id += 1;
        self.frames.push(Frame { id, table });
        ScopeHandle {
            id,
            depth: self.frames.len(),
        }
    }

    /// Pop the scope identified by `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::OutOfOrder`] when newer scopes are still active,
    /// and [`ScopeError::Stale`] when the handle is not active at all. The
    /// stack is left unchanged on error.
    pub fn pop_scope(&mut self, handle: ScopeHandle) -> Result<(), ScopeError> {
        match self.frames.last() {
            Some(top) if top.id == handle.id => {
                self.frames.pop();
                Ok(())
            }
            _ if self.is_live(handle) => Err(ScopeError::OutOfOrder {
                depth: handle.depth,
                above: self.frames.len() - handle.depth,
            }),
            _ => Err(ScopeError::Stale {
                depth: handle.depth,
            }),
        }
    }

    /// Push a scope and return a guard that pops it when dropped.
    ///
    /// The guard derefs to the store, so nested scopes are pushed through it.
    pub fn scoped(&mut self, overrides: &Overrides) -> ScopeGuard<'_> {
        let handle = self.push_scope(overrides);
        ScopeGuard {
            store: self,
            handle: Some(handle),
        }
    }

    fn is_live(&self, handle: ScopeHandle) -> bool {
        handle
            .depth
            .checked_sub(1)
            .and_then(|idx| self.frames.get(idx))
            .is_some_and(|frame| frame.id == handle.id)
    }

    /// Pop `handle` and every scope above it. Returns the number of scopes
    /// that were above it.
    fn unwind(&mut self, handle: ScopeHandle) -> usize {
        if !self.is_live(handle) {
            return 0;
        }
        let leaked = self.frames.len() - handle.depth;
        self.frames.truncate(handle.depth - 1);
        leaked
    }
}

/// Guard for a scope pushed with [`ContextStore::scoped`].
///
/// Dropping the guard pops its scope, along with any scopes pushed through the
/// guard and never popped. Use [`close`](Self::close) to pop explicitly and
/// observe discipline violations.
pub struct ScopeGuard<'a> {
    store: &'a mut ContextStore,
    handle: Option<ScopeHandle>,
}

impl ScopeGuard<'_> {
    /// Handle of the guarded scope.
    #[must_use]
    pub fn handle(&self) -> Option<ScopeHandle> {
        self.handle
    }

    /// Pop the guarded scope.
    ///
    /// # Errors
    ///
    /// Returns the [`ScopeError`] from [`ContextStore::pop_scope`] when scopes
    /// pushed after this one are still active. Those scopes and this one are
    /// then unwound when the guard is dropped.
    pub fn close(mut self) -> Result<(), ScopeError> {
        let Some(handle) = self.handle else {
            return Ok(());
        };
        self.store.pop_scope(handle)?;
        self.handle = None;
        Ok(())
    }
}

impl Deref for ScopeGuard<'_> {
    type Target = ContextStore;

    fn deref(&self) -> &ContextStore {
        self.store
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut ContextStore {
        self.store
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let leaked = self.store.unwind(handle);
            if leaked > 0 {
                tracing::error!(
                    depth = handle.depth,
                    leaked,
                    "Scope guard unwound scopes that were never popped"
                );
            }
        }
    }
}
