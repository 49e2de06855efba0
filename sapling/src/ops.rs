//! Structural tree mutations.
//!
//! Every operation is a short synchronous arena edit. Inserting a node that
//! is already attached moves it; detaching never frees the arena slot, so
//! removed nodes stay valid handles and can be inserted again.

use indextree::NodeId;

use crate::arena::Document;
use crate::error::{DomError, DomResult};
use crate::tracing_macros::debug;

impl Document {
    fn require_parent(&self, node: NodeId) -> DomResult<NodeId> {
        self.arena[node].parent().ok_or(DomError::Orphan)
    }

    /// Error if `node` sits on the ancestor chain of `parent` (inserting it
    /// below `parent` would make it its own ancestor).
    fn guard_hierarchy(&self, parent: NodeId, node: NodeId) -> DomResult<()> {
        if parent.ancestors(&self.arena).any(|a| a == node) {
            return Err(DomError::HierarchyViolation);
        }
        Ok(())
    }

    /// Insert `new` as the immediate next sibling of `anchor`.
    ///
    /// Errors if `anchor` has no parent.
    pub fn insert_after(&mut self, anchor: NodeId, new: NodeId) -> DomResult<()> {
        let parent = self.require_parent(anchor)?;
        if new == anchor {
            // re-inserting at its own position: nothing to move
            return Ok(());
        }
        self.guard_hierarchy(parent, new)?;
        new.detach(&mut self.arena);
        anchor.insert_after(new, &mut self.arena);
        debug!("inserted {:?} after {:?}", new, anchor);
        Ok(())
    }

    /// Insert `new` as the immediate previous sibling of `anchor`.
    ///
    /// Errors if `anchor` has no parent.
    pub fn insert_before(&mut self, anchor: NodeId, new: NodeId) -> DomResult<()> {
        let parent = self.require_parent(anchor)?;
        if new == anchor {
            return Ok(());
        }
        self.guard_hierarchy(parent, new)?;
        new.detach(&mut self.arena);
        anchor.insert_before(new, &mut self.arena);
        debug!("inserted {:?} before {:?}", new, anchor);
        Ok(())
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.guard_hierarchy(parent, child)?;
        child.detach(&mut self.arena);
        parent.append(child, &mut self.arena);
        debug!("appended {:?} to {:?}", child, parent);
        Ok(())
    }

    /// Make `wrapper` the new parent of `target`, at `target`'s old position.
    ///
    /// Inserts `wrapper` immediately before `target`, then appends `target`
    /// into `wrapper`. The insertion must happen first: it establishes the
    /// position while `target` is still attached.
    pub fn wrap(&mut self, target: NodeId, wrapper: NodeId) -> DomResult<()> {
        self.insert_before(target, wrapper)?;
        self.append(wrapper, target)
    }

    /// Detach `node` from its parent and return it, for chaining.
    ///
    /// Errors if `node` has no parent.
    pub fn remove(&mut self, node: NodeId) -> DomResult<NodeId> {
        self.require_parent(node)?;
        node.detach(&mut self.arena);
        debug!("removed {:?}", node);
        Ok(node)
    }

    /// Detach every child of `parent`; return the element children that were
    /// removed, in original order.
    ///
    /// Text and comment children are removed too but not reported.
    pub fn empty(&mut self, parent: NodeId) -> Vec<NodeId> {
        let mut removed = Vec::new();
        while let Some(child) = self.arena[parent].first_child() {
            if self.get(child).is_element() {
                removed.push(child);
            }
            child.detach(&mut self.arena);
        }
        removed
    }
}
