//! Tree traversal.
//!
//! Collections come back as eagerly-built `Vec`s: a snapshot of the tree at
//! call time, with no live-update semantics.

use indextree::NodeId;

use crate::arena::Document;

impl Document {
    /// Parent of `node`, if attached. The root element's parent is the
    /// invisible document node.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena[node].parent()
    }

    /// All child nodes of `node`, in order, text and comments included.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        node.children(&self.arena).collect()
    }

    /// Element children of `node`, in order.
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        node.children(&self.arena)
            .filter(|&child| self.get(child).is_element())
            .collect()
    }

    /// Element siblings of `node`, in order, excluding `node` itself.
    /// Empty if `node` has no parent.
    pub fn siblings(&self, node: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.arena[node].parent() else {
            return Vec::new();
        };
        parent
            .children(&self.arena)
            .filter(|&sibling| sibling != node && self.get(sibling).is_element())
            .collect()
    }

    /// Nearest element sibling after `node`, skipping text and comments.
    pub fn next_element(&self, node: NodeId) -> Option<NodeId> {
        let mut cursor = self.arena[node].next_sibling();
        while let Some(sibling) = cursor {
            if self.get(sibling).is_element() {
                return Some(sibling);
            }
            cursor = self.arena[sibling].next_sibling();
        }
        None
    }

    /// Nearest element sibling before `node`, skipping text and comments.
    pub fn previous_element(&self, node: NodeId) -> Option<NodeId> {
        let mut cursor = self.arena[node].previous_sibling();
        while let Some(sibling) = cursor {
            if self.get(sibling).is_element() {
                return Some(sibling);
            }
            cursor = self.arena[sibling].previous_sibling();
        }
        None
    }

    /// Zero-based position of `node` among its parent's element children:
    /// the count of preceding element siblings. `None` when `node` has no
    /// parent or is not an element child (e.g. a text node).
    pub fn index(&self, node: NodeId) -> Option<usize> {
        let parent = self.arena[node].parent()?;
        parent
            .children(&self.arena)
            .filter(|&child| self.get(child).is_element())
            .position(|child| child == node)
    }
}

/// Invoke `f` once per node, in order.
///
/// Plain iteration with callback ergonomics; panics inside `f` propagate,
/// there is no isolation between iterations.
pub fn each<F>(nodes: &[NodeId], mut f: F)
where
    F: FnMut(NodeId),
{
    for &node in nodes {
        f(node);
    }
}
