//! Ordered selection set with modifier-key algebra.
//!
//! Order is insertion order and is load-bearing: the gizmo derives its
//! pivot anchor from the first selected node. Uniqueness is enforced on
//! every mutation path.

use super::node::NodeId;

/// How a new hit set combines with the existing selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Replace the selection with the hit set (no modifier)
    #[default]
    Replace,
    /// Hits first, pre-existing selection appended (Shift)
    Append,
    /// Toggle each hit in or out of the selection (Ctrl/Cmd)
    Toggle,
}

impl SelectionMode {
    /// Determine combine mode from modifier keys. Ctrl wins over Shift.
    pub fn from_modifiers(shift: bool, ctrl: bool) -> Self {
        if ctrl {
            Self::Toggle
        } else if shift {
            Self::Append
        } else {
            Self::Replace
        }
    }
}

/// Ordered, duplicate-free set of selected node handles.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    items: Vec<NodeId>,
    dirty: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected handles in insertion order.
    pub fn items(&self) -> &[NodeId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.items.contains(&id)
    }

    /// First selected node; the gizmo's object-center anchor.
    pub fn first(&self) -> Option<NodeId> {
        self.items.first().copied()
    }

    /// Check and clear the changed-since-last-check flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Replace the selection with a single node.
    pub fn select(&mut self, id: NodeId) {
        self.set(vec![id]);
    }

    /// Add a node, keeping existing order. No-op if already selected.
    pub fn add(&mut self, id: NodeId) {
        if !self.items.contains(&id) {
            self.items.push(id);
            self.dirty = true;
        }
    }

    /// Toggle a node's membership.
    pub fn toggle(&mut self, id: NodeId) {
        if let Some(pos) = self.items.iter().position(|&e| e == id) {
            self.items.remove(pos);
        } else {
            self.items.push(id);
        }
        self.dirty = true;
    }

    /// Remove a node (e.g. destroyed externally). No-op if absent.
    pub fn remove(&mut self, id: NodeId) {
        if let Some(pos) = self.items.iter().position(|&e| e == id) {
            self.items.remove(pos);
            self.dirty = true;
        }
    }

    /// Clear the selection. Used on scene change.
    pub fn clear(&mut self) {
        if !self.items.is_empty() {
            self.items.clear();
            self.dirty = true;
        }
    }

    /// Replace the selection wholesale, deduplicating while keeping order.
    pub fn set(&mut self, ids: Vec<NodeId>) {
        let mut deduped = Vec::with_capacity(ids.len());
        for id in ids {
            if !deduped.contains(&id) {
                deduped.push(id);
            }
        }
        if deduped != self.items {
            self.items = deduped;
            self.dirty = true;
        }
    }

    /// Combine a hit set with a base selection under the given mode.
    ///
    /// The base is the selection snapshot taken at drag start, so repeated
    /// recomputation during a drag stays stable.
    pub fn combine(base: &[NodeId], hits: &[NodeId], mode: SelectionMode) -> Vec<NodeId> {
        match mode {
            SelectionMode::Replace => hits.to_vec(),
            SelectionMode::Append => {
                let mut result = hits.to_vec();
                for &id in base {
                    if !result.contains(&id) {
                        result.push(id);
                    }
                }
                result
            }
            SelectionMode::Toggle => {
                let mut result: Vec<NodeId> =
                    base.iter().copied().filter(|id| !hits.contains(id)).collect();
                for &id in hits {
                    if !base.contains(&id) {
                        result.push(id);
                    }
                }
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: NodeId = NodeId(1);
    const B: NodeId = NodeId(2);
    const C: NodeId = NodeId(3);

    #[test]
    fn test_select_replaces() {
        let mut sel = Selection::new();
        sel.select(A);
        sel.select(B);
        assert_eq!(sel.items(), &[B]);
    }

    #[test]
    fn test_add_preserves_order_and_uniqueness() {
        let mut sel = Selection::new();
        sel.add(A);
        sel.add(B);
        sel.add(A);
        assert_eq!(sel.items(), &[A, B]);
        assert_eq!(sel.first(), Some(A));
    }

    #[test]
    fn test_toggle() {
        let mut sel = Selection::new();
        sel.add(A);
        sel.toggle(A);
        assert!(sel.is_empty());
        sel.toggle(B);
        assert_eq!(sel.items(), &[B]);
    }

    #[test]
    fn test_dirty_flag() {
        let mut sel = Selection::new();
        assert!(!sel.take_dirty());
        sel.add(A);
        assert!(sel.take_dirty());
        assert!(!sel.take_dirty());
        sel.set(vec![A]);
        // Unchanged content does not dirty
        assert!(!sel.take_dirty());
    }

    #[test]
    fn test_combine_replace() {
        assert_eq!(Selection::combine(&[A, B], &[B, C], SelectionMode::Replace), vec![B, C]);
    }

    #[test]
    fn test_combine_append_hits_first() {
        assert_eq!(
            Selection::combine(&[A, B], &[B, C], SelectionMode::Append),
            vec![B, C, A]
        );
    }

    #[test]
    fn test_combine_toggle() {
        assert_eq!(Selection::combine(&[A, B], &[B, C], SelectionMode::Toggle), vec![A, C]);
    }

    #[test]
    fn test_mode_from_modifiers() {
        assert_eq!(SelectionMode::from_modifiers(false, false), SelectionMode::Replace);
        assert_eq!(SelectionMode::from_modifiers(true, false), SelectionMode::Append);
        assert_eq!(SelectionMode::from_modifiers(false, true), SelectionMode::Toggle);
        assert_eq!(SelectionMode::from_modifiers(true, true), SelectionMode::Toggle);
    }
}
