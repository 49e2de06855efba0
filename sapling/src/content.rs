//! Attribute, text, and inner-HTML access.

use indextree::NodeId;
use tendril::StrTendril;

use crate::arena::{Document, NodeData, NodeKind};
use crate::error::{DomError, DomResult};
use crate::parser;

impl Document {
    /// Current value of an attribute, or `None` if unset or `node` is not an
    /// element.
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node).as_element()?.get_attr(name)
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        let elem = self
            .get_mut(node)
            .as_element_mut()
            .ok_or(DomError::NotAnElement)?;
        elem.set_attr(name, value);
        Ok(())
    }

    /// Remove an attribute. Returns the old value if it existed.
    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> Option<StrTendril> {
        self.get_mut(node).as_element_mut()?.remove_attr(name)
    }

    /// Concatenated text of `node` and all its descendants, in document
    /// order. Comments contribute nothing.
    pub fn text(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.get(node).kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Comment(_) => {}
            _ => {
                for child in node.children(&self.arena) {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Replace `node`'s content with plain text.
    ///
    /// For elements, all children are detached and a single text node takes
    /// their place (none for the empty string). Text and comment nodes get
    /// their content replaced in place. The same text source backs
    /// [`Document::text`], so set-then-get round-trips.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let NodeKind::Text(content) | NodeKind::Comment(content) = &mut self.get_mut(node).kind
        {
            *content = StrTendril::from(text);
            return;
        }

        self.empty(node);
        if !text.is_empty() {
            let text_node = self.arena.new_node(NodeData::text(StrTendril::from(text)));
            node.append(text_node, &mut self.arena);
        }
    }

    /// Parse `markup` and replace `node`'s children with the result.
    ///
    /// The markup is trusted as-is; there is no sanitization.
    pub fn set_inner_html(&mut self, node: NodeId, markup: &str) -> DomResult<()> {
        if !self.get(node).is_element() {
            return Err(DomError::NotAnElement);
        }

        self.empty(node);
        let fragment = parser::parse_fragment(markup);
        let tops: Vec<NodeId> = fragment.root.children(&fragment.arena).collect();
        for top in tops {
            let adopted = self.adopt(&fragment, top);
            node.append(adopted, &mut self.arena);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_roundtrip() {
        let mut doc = Document::html5();
        let body = doc.body().unwrap();

        assert_eq!(doc.attr(body, "title"), None);
        doc.set_attr(body, "title", "greeting").unwrap();
        assert_eq!(doc.attr(body, "title"), Some("greeting"));
    }

    #[test]
    fn test_set_attr_on_text_node() {
        let mut doc = Document::html5();
        let body = doc.body().unwrap();
        doc.set_text(body, "hello");
        let text = doc.children(body)[0];

        assert_eq!(doc.set_attr(text, "x", "y"), Err(DomError::NotAnElement));
        assert_eq!(doc.attr(text, "x"), None);
    }

    #[test]
    fn test_text_collects_descendants() {
        let mut doc = Document::html5();
        let body = doc.body().unwrap();
        doc.set_inner_html(body, "Hello <span>world</span>!").unwrap();

        assert_eq!(doc.text(body), "Hello world!");
    }

    #[test]
    fn test_set_text_replaces_children() {
        let mut doc = Document::html5();
        let body = doc.body().unwrap();
        doc.set_inner_html(body, "<div>a</div><div>b</div>").unwrap();

        doc.set_text(body, "plain");
        let children = doc.children(body);
        assert_eq!(children.len(), 1);
        assert_eq!(doc.get(children[0]).as_text(), Some("plain"));
        assert_eq!(doc.text(body), "plain");
    }

    #[test]
    fn test_set_text_empty_clears() {
        let mut doc = Document::html5();
        let body = doc.body().unwrap();
        doc.set_inner_html(body, "<div>a</div>").unwrap();

        doc.set_text(body, "");
        assert!(doc.children(body).is_empty());
    }

    #[test]
    fn test_inner_html_roundtrip() {
        let mut doc = Document::html5();
        let body = doc.body().unwrap();
        doc.set_inner_html(body, r#"<div class="a">one</div><div class="b">two</div>"#)
            .unwrap();

        assert_eq!(
            doc.inner_html(body),
            r#"<div class="a">one</div><div class="b">two</div>"#
        );
    }

    #[test]
    fn test_set_inner_html_untrimmed_whitespace_kept() {
        let mut doc = Document::html5();
        let body = doc.body().unwrap();
        doc.set_inner_html(body, " <b>x</b> ").unwrap();

        let children = doc.children(body);
        assert_eq!(children.len(), 3);
        assert_eq!(doc.get(children[0]).as_text(), Some(" "));
    }
}
