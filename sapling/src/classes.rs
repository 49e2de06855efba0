//! Class-set membership over the `class` attribute.
//!
//! The attribute is the single source of truth; nothing is cached. Adding a
//! class that is already present, or removing one that is absent, is a no-op.

use indextree::NodeId;

use crate::arena::Document;
use crate::error::DomResult;

impl Document {
    /// Class names of `node`, in attribute order. Empty for non-elements.
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.attr(node, "class")
            .map(|value| value.split_ascii_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Whether `node` carries `name` in its class set.
    pub fn has_class(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, "class")
            .is_some_and(|value| value.split_ascii_whitespace().any(|class| class == name))
    }

    /// Add `name` to the class set. No-op if already present.
    pub fn add_class(&mut self, node: NodeId, name: &str) -> DomResult<()> {
        if self.has_class(node, name) {
            return Ok(());
        }
        let value = match self.attr(node, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {name}", existing.trim()),
            _ => name.to_string(),
        };
        self.set_attr(node, "class", &value)
    }

    /// Remove `name` from the class set. No-op if absent.
    pub fn remove_class(&mut self, node: NodeId, name: &str) -> DomResult<()> {
        if !self.has_class(node, name) {
            return Ok(());
        }
        let remaining = self
            .classes(node)
            .into_iter()
            .filter(|class| class != name)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(node, "class", &remaining)
    }
}
