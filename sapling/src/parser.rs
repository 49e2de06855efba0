//! HTML5 parsing into the arena document.
//!
//! A [`TreeSink`] implementation builds [`Document`] trees directly in the
//! arena, using html5ever's tree construction algorithm with full
//! browser-compatible error recovery. Two entry points:
//!
//! - [`parse`] for whole documents
//! - [`parse_fragment`] for detached markup fragments, which backs
//!   [`Document::create`] and `set_inner_html`
//!
//! Fragments are parsed with a `<template>` context element, so
//! context-sensitive content like `<tr>` keeps its structure instead of being
//! foster-parented away.

use html5ever::tree_builder::{ElemName, ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, LocalName, QualName};
use html5ever::{local_name, namespace_url, ns};
use indextree::{Arena, NodeId};
use std::borrow::Cow;
use std::cell::RefCell;
use tendril::{StrTendril, TendrilSink};

use crate::arena::{Document, ElementData, Namespace, NodeData, NodeKind};

/// Parse a whole HTML document.
///
/// html5ever creates subtendrils sharing the source buffer, so tag names,
/// attribute values, and text come out as cheap refcounted slices.
pub fn parse(html: &str) -> Document {
    let sink = DomSink::new();
    html5ever::parse_document(sink, Default::default()).one(StrTendril::from(html))
}

/// Parse a markup fragment in a detached `<template>` context.
///
/// The returned document's root is a synthetic container element whose
/// children are the parsed fragment nodes, in source order.
pub fn parse_fragment(markup: &str) -> Document {
    let sink = DomSink::new();
    let context = QualName::new(None, ns!(html), local_name!("template"));
    html5ever::parse_fragment(sink, Default::default(), context, Vec::new())
        .one(StrTendril::from(markup))
}

impl Document {
    /// Parse a whole HTML document. Alias for [`parse`].
    pub fn parse(html: &str) -> Document {
        parse(html)
    }

    /// Parse a trimmed markup fragment and adopt its first node into this
    /// document, detached. Returns `None` if the fragment produced no nodes.
    ///
    /// No validation beyond what the HTML5 parser tolerates: malformed
    /// markup is error-recovered, not rejected.
    pub fn create(&mut self, markup: &str) -> Option<NodeId> {
        let fragment = parse_fragment(markup.trim());
        let first = fragment.root.children(&fragment.arena).next()?;
        Some(self.adopt(&fragment, first))
    }
}

/// Owned element name wrapper
#[derive(Debug, Clone)]
struct OwnedElemName(QualName);

impl ElemName for OwnedElemName {
    fn ns(&self) -> &html5ever::Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// TreeSink building the arena document. Interior mutability because the
/// tree builder only hands out `&self`.
struct DomSink {
    arena: RefCell<Arena<NodeData>>,

    /// Document node (parent of `<html>`)
    document: NodeId,

    /// DOCTYPE encountered during parse
    doctype: RefCell<Option<StrTendril>>,
}

impl DomSink {
    fn new() -> Self {
        let mut arena = Arena::new();
        let document = arena.new_node(NodeData::document());

        DomSink {
            arena: RefCell::new(arena),
            document,
            doctype: RefCell::new(None),
        }
    }

    fn new_node(&self, kind: NodeKind, ns: Namespace) -> NodeId {
        self.arena.borrow_mut().new_node(NodeData { kind, ns })
    }
}

impl TreeSink for DomSink {
    type Handle = NodeId;
    type Output = Document;
    type ElemName<'a>
        = OwnedElemName
    where
        Self: 'a;

    fn finish(self) -> Document {
        let arena = self.arena.into_inner();

        // Root is the first child of the document node (the `<html>` element,
        // or the synthetic container in fragment mode).
        let root = self
            .document
            .children(&arena)
            .next()
            .unwrap_or(self.document);

        Document {
            arena,
            root,
            doctype: self.doctype.into_inner(),
        }
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {
        // html5ever recovers on its own; nothing to do
    }

    fn get_document(&self) -> NodeId {
        self.document
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn same_node(&self, a: &NodeId, b: &NodeId) -> bool {
        a == b
    }

    fn elem_name<'a>(&'a self, target: &'a NodeId) -> OwnedElemName {
        let arena = self.arena.borrow();
        let node = arena[*target].get();

        let NodeKind::Element(elem) = &node.kind else {
            // Not an element - placeholder name
            return OwnedElemName(QualName::new(None, ns!(html), local_name!("")));
        };

        let ns = match node.ns {
            Namespace::Html => ns!(html),
            Namespace::Svg => ns!(svg),
            Namespace::MathMl => ns!(mathml),
        };
        OwnedElemName(QualName::new(None, ns, LocalName::from(elem.tag.as_ref())))
    }

    fn create_element(&self, name: QualName, attrs: Vec<Attribute>, _flags: ElementFlags) -> NodeId {
        let mut elem = ElementData::new(StrTendril::from(name.local.as_ref()));
        for attr in attrs {
            // first occurrence wins, matching browser duplicate handling
            elem.attrs
                .entry(attr.name.local.to_string())
                .or_insert(attr.value);
        }

        self.new_node(NodeKind::Element(elem), Namespace::from_url(name.ns.as_ref()))
    }

    fn create_comment(&self, text: StrTendril) -> NodeId {
        self.new_node(NodeKind::Comment(text), Namespace::Html)
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> NodeId {
        // Processing instructions are not representable; keep an empty comment
        self.new_node(NodeKind::Comment(StrTendril::new()), Namespace::Html)
    }

    fn append(&self, parent: &NodeId, child: NodeOrText<NodeId>) {
        let mut arena = self.arena.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => {
                parent.append(node, &mut arena);
            }
            NodeOrText::AppendText(text) => {
                // Merge with a trailing text node, the way browsers do
                if let Some(last) = arena[*parent].last_child()
                    && let NodeKind::Text(existing) = &mut arena[last].get_mut().kind
                {
                    existing.push_tendril(&text);
                    return;
                }

                let text_node = arena.new_node(NodeData::text(text));
                parent.append(text_node, &mut arena);
            }
        }
    }

    fn append_before_sibling(&self, sibling: &NodeId, new_node: NodeOrText<NodeId>) {
        let mut arena = self.arena.borrow_mut();
        let node = match new_node {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => arena.new_node(NodeData::text(text)),
        };
        sibling.insert_before(node, &mut arena);
    }

    fn append_based_on_parent_node(
        &self,
        element: &NodeId,
        _prev_element: &NodeId,
        child: NodeOrText<NodeId>,
    ) {
        self.append(element, child);
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        *self.doctype.borrow_mut() = Some(name);
    }

    fn get_template_contents(&self, target: &NodeId) -> NodeId {
        // Template contents are not a separate fragment here; children hang
        // off the template element itself
        *target
    }

    fn add_attrs_if_missing(&self, target: &NodeId, attrs: Vec<Attribute>) {
        let mut arena = self.arena.borrow_mut();
        if let NodeKind::Element(elem) = &mut arena[*target].get_mut().kind {
            for attr in attrs {
                elem.attrs
                    .entry(attr.name.local.to_string())
                    .or_insert(attr.value);
            }
        }
    }

    fn remove_from_parent(&self, target: &NodeId) {
        target.detach(&mut self.arena.borrow_mut());
    }

    fn reparent_children(&self, node: &NodeId, new_parent: &NodeId) {
        let mut arena = self.arena.borrow_mut();
        let children: Vec<NodeId> = node.children(&arena).collect();
        for child in children {
            child.detach(&mut arena);
            new_parent.append(child, &mut arena);
        }
    }
}
