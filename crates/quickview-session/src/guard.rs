//! Focus containment and scroll suppression for the open overlay.
//!
//! [`FocusGuard`] is acquired when the overlay opens and torn down when it is
//! dropped. Teardown always unlocks page scrolling and hands focus back to
//! the element that held it before activation, if that element is still in
//! the document.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Identifier of an element in the host document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The focus and scroll surface of the page hosting the overlay.
///
/// There is one of these per page; only one guard may hold it at a time.
pub trait Document {
    /// The element that currently has keyboard focus.
    fn active_element(&self) -> Option<ElementId>;

    /// Moves focus to `element`. Focusing a detached element is a no-op.
    fn focus(&mut self, element: &ElementId);

    /// `true` while `element` is still part of the document.
    fn is_attached(&self, element: &ElementId) -> bool;

    /// Focusable descendants of `container`, in tab order.
    fn focusable_within(&self, container: &ElementId) -> Vec<ElementId>;

    fn set_scroll_locked(&mut self, locked: bool);

    /// Called after every session change with the overlay's focusable
    /// controls in tab order (empty once closed). Hosts that render the
    /// overlay themselves can ignore it.
    fn render(&mut self, _container: &ElementId, _focusable: &[ElementId]) {}
}

pub type SharedDocument<D> = Arc<Mutex<D>>;

/// Locks the shared document. A poisoned lock still holds valid focus state,
/// so the poison is discarded.
pub(crate) fn lock_document<D>(document: &Mutex<D>) -> MutexGuard<'_, D> {
    document.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scoped focus trap plus scroll lock.
pub struct FocusGuard<D: Document> {
    document: SharedDocument<D>,
    container: ElementId,
    restore_to: Option<ElementId>,
    trap_installed: bool,
}

impl<D: Document> FocusGuard<D> {
    /// Records the current focus, locks scrolling and focuses `container`.
    ///
    /// When `container` has no focusable descendants at this point the trap
    /// is not installed and Tab handling stays a no-op for the guard's
    /// lifetime; scroll lock and focus restore still apply.
    pub fn activate(document: SharedDocument<D>, container: ElementId) -> Self {
        let (restore_to, trap_installed) = {
            let mut doc = lock_document(&document);
            let restore_to = doc.active_element();
            doc.set_scroll_locked(true);
            doc.focus(&container);
            let trap_installed = !doc.focusable_within(&container).is_empty();
            (restore_to, trap_installed)
        };

        tracing::debug!(
            container = %container,
            restore_to = ?restore_to.as_ref().map(ElementId::as_str),
            trap_installed,
            "focus guard activated"
        );

        Self {
            document,
            container,
            restore_to,
            trap_installed,
        }
    }

    #[must_use]
    pub fn trap_installed(&self) -> bool {
        self.trap_installed
    }

    /// Cycles focus through the container's focusable descendants, wrapping
    /// from last to first (or first to last when `backwards`).
    ///
    /// Focus sitting on the container itself or anywhere outside the
    /// descendants moves to the first (or last) one. Returns the newly
    /// focused element, or `None` when the trap is not installed or the
    /// container currently has nothing focusable.
    pub fn handle_tab(&self, backwards: bool) -> Option<ElementId> {
        if !self.trap_installed {
            return None;
        }

        let mut doc = lock_document(&self.document);
        let focusable = doc.focusable_within(&self.container);
        let last = focusable.len().checked_sub(1)?;

        let current = doc
            .active_element()
            .and_then(|active| focusable.iter().position(|el| *el == active));

        let next = match (current, backwards) {
            (None, false) => 0,
            (None, true) => last,
            (Some(i), false) if i == last => 0,
            (Some(i), false) => i + 1,
            (Some(0), true) => last,
            (Some(i), true) => i - 1,
        };

        let target = focusable[next].clone();
        doc.focus(&target);
        Some(target)
    }
}

impl<D: Document> Drop for FocusGuard<D> {
    fn drop(&mut self) {
        let mut doc = lock_document(&self.document);
        doc.set_scroll_locked(false);

        if let Some(previous) = &self.restore_to {
            if doc.is_attached(previous) {
                doc.focus(previous);
            } else {
                tracing::debug!(element = %previous, "previously focused element is gone; focus not restored");
            }
        }

        tracing::debug!(container = %self.container, "focus guard released");
    }
}
