//! In-memory [`Document`] used by the terminal front end and tests.

use crate::guard::{Document, ElementId};

#[derive(Debug, Clone)]
struct Node {
    id: ElementId,
    parent: Option<ElementId>,
    focusable: bool,
}

/// A flat element tree with a single focus slot and a scroll-lock flag.
///
/// Tab order is insertion order.
#[derive(Debug, Default)]
pub struct HeadlessDocument {
    nodes: Vec<Node>,
    active: Option<ElementId>,
    scroll_locked: bool,
}

impl HeadlessDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `id` under `parent` (or at the root). Re-inserting an existing
    /// id replaces its parent and focusability and moves it to the end.
    pub fn insert(&mut self, id: impl Into<ElementId>, parent: Option<&ElementId>, focusable: bool) {
        let id = id.into();
        self.nodes.retain(|n| n.id != id);
        self.nodes.push(Node {
            id,
            parent: parent.cloned(),
            focusable,
        });
    }

    /// Detaches `id` and its whole subtree. Focus inside the subtree is lost.
    pub fn remove(&mut self, id: &ElementId) {
        let doomed: Vec<ElementId> = self
            .nodes
            .iter()
            .filter(|n| n.id == *id || self.is_descendant(&n.id, id))
            .map(|n| n.id.clone())
            .collect();

        self.nodes.retain(|n| !doomed.contains(&n.id));
        if self.active.as_ref().is_some_and(|a| doomed.contains(a)) {
            self.active = None;
        }
    }

    /// Replaces every child of `container` with `children`, all focusable.
    /// Focus stays put if the focused element survives the swap.
    pub fn replace_children(&mut self, container: &ElementId, children: &[ElementId]) {
        let stale: Vec<ElementId> = self
            .nodes
            .iter()
            .filter(|n| n.parent.as_ref() == Some(container) && !children.contains(&n.id))
            .map(|n| n.id.clone())
            .collect();
        for id in &stale {
            self.remove(id);
        }
        for child in children {
            self.insert(child.clone(), Some(container), true);
        }
    }

    #[must_use]
    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    fn parent_of(&self, id: &ElementId) -> Option<&ElementId> {
        self.nodes
            .iter()
            .find(|n| n.id == *id)
            .and_then(|n| n.parent.as_ref())
    }

    fn is_descendant(&self, id: &ElementId, ancestor: &ElementId) -> bool {
        let mut cursor = self.parent_of(id);
        while let Some(parent) = cursor {
            if parent == ancestor {
                return true;
            }
            cursor = self.parent_of(parent);
        }
        false
    }
}

impl Document for HeadlessDocument {
    fn active_element(&self) -> Option<ElementId> {
        self.active.clone()
    }

    fn focus(&mut self, element: &ElementId) {
        if self.is_attached(element) {
            self.active = Some(element.clone());
        }
    }

    fn is_attached(&self, element: &ElementId) -> bool {
        self.nodes.iter().any(|n| n.id == *element)
    }

    fn focusable_within(&self, container: &ElementId) -> Vec<ElementId> {
        self.nodes
            .iter()
            .filter(|n| n.focusable && self.is_descendant(&n.id, container))
            .map(|n| n.id.clone())
            .collect()
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
    }

    fn render(&mut self, container: &ElementId, focusable: &[ElementId]) {
        if !self.is_attached(container) {
            self.insert(container.clone(), None, false);
        }
        self.replace_children(container, focusable);
    }
}
