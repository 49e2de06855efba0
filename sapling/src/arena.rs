//! Arena-based document tree.
//!
//! All nodes of a [`Document`] live in one [`indextree::Arena`]; a node is
//! addressed by its [`NodeId`], which is only meaningful together with the
//! owning document. Detaching a node never frees its arena slot, so a removed
//! node stays a valid handle and can be inserted again elsewhere.

use indexmap::IndexMap;
use indextree::{Arena, NodeId};
use tendril::StrTendril;

use crate::tracing_macros::debug;

/// A document: the arena, the root element, and the doctype if one was seen.
#[derive(Debug, Clone)]
pub struct Document {
    /// THE tree - all nodes live here
    pub arena: Arena<NodeData>,

    /// Root node (usually `<html>`; its parent is the invisible document node)
    pub root: NodeId,

    /// DOCTYPE if present (usually "html")
    pub doctype: Option<StrTendril>,
}

impl Document {
    /// Build an empty HTML5 skeleton: `<html>` with `<head>` and `<body>`.
    pub fn html5() -> Self {
        let mut arena = Arena::new();
        let document = arena.new_node(NodeData::document());
        let root = arena.new_node(NodeData::element("html"));
        document.append(root, &mut arena);
        let head = arena.new_node(NodeData::element("head"));
        root.append(head, &mut arena);
        let body = arena.new_node(NodeData::element("body"));
        root.append(body, &mut arena);

        Document {
            arena,
            root,
            doctype: Some(StrTendril::from("html")),
        }
    }

    /// Get immutable reference to node data
    pub fn get(&self, id: NodeId) -> &NodeData {
        self.arena[id].get()
    }

    /// Get mutable reference to node data
    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeData {
        self.arena[id].get_mut()
    }

    /// Tag name if `id` is an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id).as_element().map(|e| e.tag.as_ref())
    }

    /// Get the `<body>` element if present
    pub fn body(&self) -> Option<NodeId> {
        self.root
            .children(&self.arena)
            .find(|&id| self.tag(id) == Some("body"))
    }

    /// Get the `<head>` element if present
    pub fn head(&self) -> Option<NodeId> {
        self.root
            .children(&self.arena)
            .find(|&id| self.tag(id) == Some("head"))
    }

    /// Deep-copy a subtree rooted in another document into this arena.
    ///
    /// Returns the id of the copy, detached. Node data clones are cheap:
    /// text and attribute values are refcounted tendrils.
    pub fn adopt(&mut self, src: &Document, node: NodeId) -> NodeId {
        let copy = self.arena.new_node(src.get(node).clone());
        for child in node.children(&src.arena) {
            let child_copy = self.adopt(src, child);
            copy.append(child_copy, &mut self.arena);
        }
        debug!("adopted subtree {:?} as {:?}", node, copy);
        copy
    }
}

/// What goes in each arena slot
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    pub ns: Namespace,
}

impl NodeData {
    /// An invisible document node.
    pub fn document() -> Self {
        NodeData {
            kind: NodeKind::Document,
            ns: Namespace::Html,
        }
    }

    /// An HTML element with no attributes.
    pub fn element(tag: &str) -> Self {
        NodeData {
            kind: NodeKind::Element(ElementData::new(StrTendril::from(tag))),
            ns: Namespace::Html,
        }
    }

    /// A text node.
    pub fn text(content: StrTendril) -> Self {
        NodeData {
            kind: NodeKind::Text(content),
            ns: Namespace::Html,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.kind {
            NodeKind::Element(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.kind {
            NodeKind::Element(elem) => Some(elem),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text.as_ref()),
            _ => None,
        }
    }
}

/// Node types
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Document root (invisible, parent of `<html>`)
    Document,
    /// Element with tag and attributes
    Element(ElementData),
    /// Text content (StrTendril is refcounted - cheap to clone)
    Text(StrTendril),
    /// HTML comment
    Comment(StrTendril),
}

/// Element data (tag + attributes)
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name (lowercase for HTML)
    pub tag: StrTendril,

    /// Attributes. IndexMap preserves insertion order for consistent
    /// serialization; keys are String, values share source buffers.
    pub attrs: IndexMap<String, StrTendril>,
}

impl ElementData {
    pub fn new(tag: StrTendril) -> Self {
        ElementData {
            tag,
            attrs: IndexMap::new(),
        }
    }

    /// Get an attribute value.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|v| v.as_ref())
    }

    /// Set an attribute value, replacing any existing one.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_string(), StrTendril::from(value));
    }

    /// Remove an attribute. Returns the old value if it existed.
    pub fn remove_attr(&mut self, name: &str) -> Option<StrTendril> {
        self.attrs.shift_remove(name)
    }
}

/// XML namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Html,
    Svg,
    MathMl,
}

impl Namespace {
    pub fn from_url(url: &str) -> Self {
        match url {
            "http://www.w3.org/2000/svg" => Namespace::Svg,
            "http://www.w3.org/1998/Math/MathML" => Namespace::MathMl,
            _ => Namespace::Html,
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            Namespace::Html => "http://www.w3.org/1999/xhtml",
            Namespace::Svg => "http://www.w3.org/2000/svg",
            Namespace::MathMl => "http://www.w3.org/1998/Math/MathML",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html5_skeleton() {
        let doc = Document::html5();
        assert_eq!(doc.doctype.as_ref().map(|d| d.as_ref()), Some("html"));
        assert_eq!(doc.tag(doc.root), Some("html"));
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
    }

    #[test]
    fn test_element_attrs() {
        let mut elem = ElementData::new(StrTendril::from("div"));
        assert_eq!(elem.get_attr("id"), None);

        elem.set_attr("id", "main");
        assert_eq!(elem.get_attr("id"), Some("main"));

        elem.set_attr("id", "other");
        assert_eq!(elem.get_attr("id"), Some("other"));
        assert_eq!(elem.attrs.len(), 1);

        assert_eq!(elem.remove_attr("id").as_deref(), Some("other"));
        assert_eq!(elem.get_attr("id"), None);
    }

    #[test]
    fn test_adopt_deep_copy() {
        let mut src = Document::html5();
        let body = src.body().unwrap();
        let div = src.arena.new_node(NodeData::element("div"));
        body.append(div, &mut src.arena);
        let text = src.arena.new_node(NodeData::text(StrTendril::from("hi")));
        div.append(text, &mut src.arena);

        let mut dst = Document::html5();
        let copy = dst.adopt(&src, div);

        assert_eq!(dst.tag(copy), Some("div"));
        let child = copy.children(&dst.arena).next().unwrap();
        assert_eq!(dst.get(child).as_text(), Some("hi"));
        // the copy is detached until inserted
        assert!(dst.arena[copy].parent().is_none());
    }

    #[test]
    fn test_namespace_urls() {
        assert_eq!(Namespace::from_url("http://www.w3.org/2000/svg"), Namespace::Svg);
        assert_eq!(Namespace::from_url("anything else"), Namespace::Html);
        assert_eq!(Namespace::Svg.url(), "http://www.w3.org/2000/svg");
    }
}
