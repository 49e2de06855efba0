//! Structural selectors and document queries.
//!
//! Supported syntax: tag names, `*`, `#id`, `.class`, `[attr]`,
//! `[attr=value]` (value optionally quoted), compounds of those, the
//! descendant combinator (whitespace), and comma-separated selector lists.
//! Anything else is a [`DomError::Selector`].
//!
//! Matching walks the arena in preorder, so results come back in document
//! order.

use std::str::FromStr;

use indextree::NodeId;
use smallvec::SmallVec;

use crate::arena::Document;
use crate::error::{DomError, DomResult};

/// One test an element must pass.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Universal,
    Tag(String),
    Id(String),
    Class(String),
    HasAttr(String),
    AttrEq(String, String),
}

/// A compound selector: every condition must hold on the same element.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    conditions: SmallVec<[Condition; 2]>,
}

/// A parsed selector: comma-separated alternatives, each a descendant chain
/// of compounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Vec<Compound>>,
}

impl Selector {
    /// Parse a selector string.
    pub fn parse(input: &str) -> DomResult<Selector> {
        let mut parser = Parser {
            input,
            rest: input.char_indices().collect(),
            pos: 0,
        };
        let mut alternatives = Vec::new();
        loop {
            alternatives.push(parser.parse_chain()?);
            parser.skip_whitespace();
            match parser.peek() {
                Some(',') => {
                    parser.bump();
                }
                None => break,
                Some(c) => {
                    return Err(DomError::Selector(format!("unexpected `{c}` in {input:?}")));
                }
            }
        }
        Ok(Selector { alternatives })
    }
}

impl FromStr for Selector {
    type Err = DomError;

    fn from_str(s: &str) -> DomResult<Selector> {
        Selector::parse(s)
    }
}

struct Parser<'a> {
    input: &'a str,
    rest: Vec<(usize, char)>,
    pos: usize,
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.rest.get(self.pos).map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Byte offset of the current position in `input`.
    fn offset(&self) -> usize {
        self.rest
            .get(self.pos)
            .map_or(self.input.len(), |&(off, _)| off)
    }

    fn parse_ident(&mut self) -> &str {
        let start = self.offset();
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        &self.input[start..self.offset()]
    }

    fn parse_ident_required(&mut self, what: &str) -> DomResult<String> {
        let ident = self.parse_ident();
        if ident.is_empty() {
            return Err(DomError::Selector(format!("expected {what} name")));
        }
        Ok(ident.to_string())
    }

    fn parse_chain(&mut self) -> DomResult<Vec<Compound>> {
        let mut chain = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None | Some(',') => break,
                _ => chain.push(self.parse_compound()?),
            }
        }
        if chain.is_empty() {
            return Err(DomError::Selector("empty selector".to_string()));
        }
        Ok(chain)
    }

    fn parse_compound(&mut self) -> DomResult<Compound> {
        let mut conditions = SmallVec::new();
        match self.peek() {
            Some('*') => {
                self.bump();
                conditions.push(Condition::Universal);
            }
            Some(c) if is_ident_char(c) => {
                // tag names are stored lowercase for HTML
                let tag = self.parse_ident().to_ascii_lowercase();
                conditions.push(Condition::Tag(tag));
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    let id = self.parse_ident_required("id")?;
                    conditions.push(Condition::Id(id));
                }
                Some('.') => {
                    self.bump();
                    let class = self.parse_ident_required("class")?;
                    conditions.push(Condition::Class(class));
                }
                Some('[') => {
                    self.bump();
                    conditions.push(self.parse_attr_condition()?);
                }
                Some(c) if c.is_whitespace() || c == ',' => break,
                None => break,
                Some(c) => {
                    return Err(DomError::Selector(format!("unexpected `{c}`")));
                }
            }
        }

        if conditions.is_empty() {
            return Err(DomError::Selector("empty compound selector".to_string()));
        }
        Ok(Compound { conditions })
    }

    fn parse_attr_condition(&mut self) -> DomResult<Condition> {
        self.skip_whitespace();
        let name = self.parse_ident_required("attribute")?;
        self.skip_whitespace();
        match self.bump() {
            Some(']') => Ok(Condition::HasAttr(name)),
            Some('=') => {
                self.skip_whitespace();
                let value = self.parse_attr_value()?;
                self.skip_whitespace();
                match self.bump() {
                    Some(']') => Ok(Condition::AttrEq(name, value)),
                    _ => Err(DomError::Selector(
                        "unclosed attribute selector".to_string(),
                    )),
                }
            }
            _ => Err(DomError::Selector(
                "unclosed attribute selector".to_string(),
            )),
        }
    }

    fn parse_attr_value(&mut self) -> DomResult<String> {
        if let Some(quote @ ('"' | '\'')) = self.peek() {
            self.bump();
            let start = self.offset();
            while let Some(c) = self.peek() {
                if c == quote {
                    let value = self.input[start..self.offset()].to_string();
                    self.bump();
                    return Ok(value);
                }
                self.bump();
            }
            return Err(DomError::Selector(
                "unterminated attribute value".to_string(),
            ));
        }

        let start = self.offset();
        while self
            .peek()
            .is_some_and(|c| c != ']' && !c.is_whitespace())
        {
            self.bump();
        }
        if self.offset() == start {
            return Err(DomError::Selector("expected attribute value".to_string()));
        }
        Ok(self.input[start..self.offset()].to_string())
    }
}

impl Document {
    fn matches_compound(&self, node: NodeId, compound: &Compound) -> bool {
        let Some(elem) = self.get(node).as_element() else {
            return false;
        };
        compound.conditions.iter().all(|condition| match condition {
            Condition::Universal => true,
            Condition::Tag(tag) => elem.tag.as_ref() == tag.as_str(),
            Condition::Id(id) => elem.get_attr("id") == Some(id.as_str()),
            Condition::Class(class) => elem
                .get_attr("class")
                .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class)),
            Condition::HasAttr(name) => elem.attrs.contains_key(name.as_str()),
            Condition::AttrEq(name, value) => elem.get_attr(name) == Some(value.as_str()),
        })
    }

    /// Match a descendant chain: the last compound against `node`, each
    /// earlier one against some strictly higher ancestor, in order. Greedy
    /// ancestor scanning is exact for descendant-only combinators.
    fn matches_chain(&self, node: NodeId, chain: &[Compound]) -> bool {
        let Some((last, rest)) = chain.split_last() else {
            return false;
        };
        if !self.matches_compound(node, last) {
            return false;
        }

        let mut remaining = rest;
        let mut cursor = node;
        while let Some((next_up, above)) = remaining.split_last() {
            loop {
                let Some(parent) = self.arena[cursor].parent() else {
                    return false;
                };
                cursor = parent;
                if self.matches_compound(cursor, next_up) {
                    break;
                }
            }
            remaining = above;
        }
        true
    }

    /// Whether `node` matches any alternative of `selector`.
    pub fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        selector
            .alternatives
            .iter()
            .any(|chain| self.matches_chain(node, chain))
    }

    /// All elements matching `selector`, in document order.
    ///
    /// With a `scope`, only descendants of `scope` (excluding `scope`
    /// itself) are searched; otherwise the whole tree from the root element
    /// down. Detached subtrees are never reached by whole-document queries.
    pub fn find(&self, selector: &str, scope: Option<NodeId>) -> DomResult<Vec<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .query_candidates(scope)
            .filter(|&id| self.matches(id, &selector))
            .collect())
    }

    /// First element matching `selector` in document order, if any.
    pub fn find_first(&self, selector: &str, scope: Option<NodeId>) -> DomResult<Option<NodeId>> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .query_candidates(scope)
            .find(|&id| self.matches(id, &selector)))
    }

    fn query_candidates(&self, scope: Option<NodeId>) -> impl Iterator<Item = NodeId> + '_ {
        let (origin, skip) = match scope {
            // a scoped query never matches the scope element itself
            Some(scope) => (scope, 1),
            None => (self.root, 0),
        };
        origin.descendants(&self.arena).skip(skip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn sample() -> Document {
        parse(concat!(
            "<html><body>",
            r#"<div id="top" class="box outer">"#,
            r#"<p class="note">one</p>"#,
            r#"<p data-kind="aside">two</p>"#,
            "</div>",
            r#"<p class="note">three</p>"#,
            "</body></html>",
        ))
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(Selector::parse(""), Err(DomError::Selector(_))));
        assert!(matches!(Selector::parse("div >"), Err(DomError::Selector(_))));
        assert!(matches!(Selector::parse("[foo"), Err(DomError::Selector(_))));
        assert!(matches!(Selector::parse("a, ,b"), Err(DomError::Selector(_))));
        assert!(matches!(Selector::parse(".#"), Err(DomError::Selector(_))));
    }

    #[test]
    fn test_tag_and_universal() {
        let doc = sample();
        assert_eq!(doc.find("p", None).unwrap().len(), 3);
        // every element in the tree
        let all = doc.find("*", None).unwrap();
        assert!(all.len() >= 6); // html, head, body, div, three p
    }

    #[test]
    fn test_id_and_class() {
        let doc = sample();
        let top = doc.find("#top", None).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(doc.tag(top[0]), Some("div"));

        // compound: both classes on the same element
        assert_eq!(doc.find(".box.outer", None).unwrap(), top);
        assert_eq!(doc.find(".note", None).unwrap().len(), 2);
    }

    #[test]
    fn test_attribute_conditions() {
        let doc = sample();
        assert_eq!(doc.find("[data-kind]", None).unwrap().len(), 1);
        assert_eq!(doc.find(r#"[data-kind="aside"]"#, None).unwrap().len(), 1);
        assert_eq!(doc.find("[data-kind=missing]", None).unwrap().len(), 0);
    }

    #[test]
    fn test_descendant_chain() {
        let doc = sample();
        let inside = doc.find("div p", None).unwrap();
        assert_eq!(inside.len(), 2);
        let deep = doc.find("html .box .note", None).unwrap();
        assert_eq!(deep.len(), 1);
    }

    #[test]
    fn test_selector_list_in_document_order() {
        let doc = sample();
        let hits = doc.find("#top, .note", None).unwrap();
        // div#top precedes both .note paragraphs in document order
        assert_eq!(hits.len(), 3);
        assert_eq!(doc.tag(hits[0]), Some("div"));
        assert_eq!(doc.tag(hits[1]), Some("p"));
    }

    #[test]
    fn test_scoped_query_excludes_scope() {
        let doc = sample();
        let div = doc.find_first("#top", None).unwrap().unwrap();
        let scoped = doc.find("p", Some(div)).unwrap();
        assert_eq!(scoped.len(), 2);
        assert!(doc.find("div", Some(div)).unwrap().is_empty());
    }

    #[test]
    fn test_quoted_attr_value_with_space() {
        let doc = parse(r#"<html><body><i title="a b">x</i></body></html>"#);
        assert_eq!(doc.find(r#"[title="a b"]"#, None).unwrap().len(), 1);
    }
}
