//! HTML5-correct serialization of arena documents.
//!
//! Rules applied:
//!
//! - Void elements never get end tags
//! - Text content is escaped; attribute values are escaped and double-quoted
//! - Raw text elements (script, style) are not escaped
//! - RCDATA elements (title, textarea) escape only `&` and `<`
//! - Foreign content (SVG/MathML) may use self-closing syntax
//! - Comments escape `--` to avoid closing early

use std::fmt::Write;

use indextree::NodeId;

use crate::arena::{Document, ElementData, Namespace, NodeKind};

/// Options for HTML serialization.
#[derive(Clone, Debug)]
pub struct SerializeOptions {
    /// Pretty-print with indentation (default: false, minified output)
    pub pretty: bool,
    /// Indentation string for pretty-printing (default: "  ")
    pub indent: String,
    /// Sort attributes alphabetically instead of keeping insertion order
    /// (default: false). Useful for snapshots and reproducible output.
    pub sort_attributes: bool,
    /// Escape `</script` sequences inside script content (default: true)
    pub escape_script_end_tags: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "  ".to_string(),
            sort_attributes: false,
            escape_script_end_tags: true,
        }
    }
}

impl SerializeOptions {
    /// New default options (minified output).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty-printing with default indentation.
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Set a custom indentation string (implies pretty-printing).
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self.pretty = true;
        self
    }

    /// Sort attributes alphabetically for deterministic output.
    pub fn sort_attributes(mut self) -> Self {
        self.sort_attributes = true;
        self
    }

    /// Leave `</script` sequences in script content untouched.
    pub fn no_escape_script_end_tags(mut self) -> Self {
        self.escape_script_end_tags = false;
        self
    }
}

/// Serialize a whole document: DOCTYPE (if any) plus the root element.
pub fn serialize_document(doc: &Document, opts: &SerializeOptions) -> String {
    let mut out = String::new();
    let mut ser = Serializer::new(doc, &mut out, opts);
    ser.write_doctype();
    ser.write_node(doc.root);
    out
}

/// Serialize one node and its subtree.
pub fn serialize_node(doc: &Document, node: NodeId, opts: &SerializeOptions) -> String {
    let mut out = String::new();
    Serializer::new(doc, &mut out, opts).write_node(node);
    out
}

/// Serialize the children of a node, without the node itself.
pub fn serialize_children(doc: &Document, node: NodeId, opts: &SerializeOptions) -> String {
    let mut out = String::new();
    let mut ser = Serializer::new(doc, &mut out, opts);
    for child in node.children(&doc.arena) {
        ser.write_node(child);
    }
    out
}

/// HTML5 void elements - these never have end tags.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Raw text elements - content is not escaped.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// RCDATA elements - only `&` and `<` are escaped.
const RCDATA_ELEMENTS: &[&str] = &["title", "textarea"];

fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

fn is_raw_text_element(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

fn is_rcdata_element(tag: &str) -> bool {
    RCDATA_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

struct Serializer<'a, W: Write> {
    doc: &'a Document,
    out: &'a mut W,
    options: &'a SerializeOptions,
    depth: usize,
}

impl<'a, W: Write> Serializer<'a, W> {
    fn new(doc: &'a Document, out: &'a mut W, options: &'a SerializeOptions) -> Self {
        Self {
            doc,
            out,
            options,
            depth: 0,
        }
    }

    fn write_indent(&mut self) {
        if self.options.pretty {
            for _ in 0..self.depth {
                let _ = write!(self.out, "{}", self.options.indent);
            }
        }
    }

    fn write_newline(&mut self) {
        if self.options.pretty {
            let _ = writeln!(self.out);
        }
    }

    fn write_doctype(&mut self) {
        if let Some(doctype) = &self.doc.doctype {
            let _ = write!(self.out, "<!DOCTYPE {doctype}>");
            self.write_newline();
        }
    }

    /// Escape text content for normal HTML elements.
    fn write_text_escaped(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '&' => {
                    let _ = write!(self.out, "&amp;");
                }
                '<' => {
                    let _ = write!(self.out, "&lt;");
                }
                '>' => {
                    let _ = write!(self.out, "&gt;");
                }
                _ => {
                    let _ = write!(self.out, "{c}");
                }
            }
        }
    }

    /// Escape text content for RCDATA elements (only & and <).
    fn write_rcdata_escaped(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '&' => {
                    let _ = write!(self.out, "&amp;");
                }
                '<' => {
                    let _ = write!(self.out, "&lt;");
                }
                _ => {
                    let _ = write!(self.out, "{c}");
                }
            }
        }
    }

    /// Write raw text content, optionally escaping script end tags.
    fn write_raw_text(&mut self, text: &str, tag: &str) {
        if self.options.escape_script_end_tags && tag.eq_ignore_ascii_case("script") {
            // ASCII case-insensitive scan over the original bytes; Unicode
            // lowercasing would shift indices
            const PATTERN: &[u8] = b"</script";
            let bytes = text.as_bytes();
            let mut last_end = 0;

            for i in 0..bytes.len().saturating_sub(PATTERN.len() - 1) {
                if bytes[i..].len() >= PATTERN.len()
                    && bytes[i..i + PATTERN.len()].eq_ignore_ascii_case(PATTERN)
                {
                    let _ = write!(self.out, "{}", &text[last_end..i]);
                    let _ = write!(self.out, "<\\/script");
                    last_end = i + PATTERN.len();
                }
            }
            let _ = write!(self.out, "{}", &text[last_end..]);
        } else {
            let _ = write!(self.out, "{text}");
        }
    }

    fn write_attr(&mut self, name: &str, value: &str) {
        let _ = write!(self.out, " {name}=\"");
        for c in value.chars() {
            match c {
                '&' => {
                    let _ = write!(self.out, "&amp;");
                }
                '<' => {
                    let _ = write!(self.out, "&lt;");
                }
                '>' => {
                    let _ = write!(self.out, "&gt;");
                }
                '"' => {
                    let _ = write!(self.out, "&quot;");
                }
                _ => {
                    let _ = write!(self.out, "{c}");
                }
            }
        }
        let _ = write!(self.out, "\"");
    }

    fn write_node(&mut self, node: NodeId) {
        match &self.doc.get(node).kind {
            NodeKind::Document => {
                // invisible; children only
                for child in node.children(&self.doc.arena) {
                    self.write_node(child);
                }
            }
            NodeKind::Element(elem) => {
                self.write_element(node, elem);
            }
            NodeKind::Text(text) => {
                // whitespace-only text nodes are kept: whitespace can be
                // significant between inline elements and in <pre>
                self.write_indent();
                self.write_text_escaped(text);
                if self.options.pretty && !text.is_empty() {
                    self.write_newline();
                }
            }
            NodeKind::Comment(text) => {
                self.write_indent();
                let safe_text = text.replace("--", "- -");
                let _ = write!(self.out, "<!--{safe_text}-->");
                self.write_newline();
            }
        }
    }

    fn write_element(&mut self, node: NodeId, elem: &ElementData) {
        let tag = elem.tag.as_ref();
        let is_void = is_void_element(tag);
        let is_raw = is_raw_text_element(tag);
        let is_rcdata = is_rcdata_element(tag);
        let is_foreign = self.doc.get(node).ns != Namespace::Html;

        self.write_indent();
        let _ = write!(self.out, "<{tag}");

        if self.options.sort_attributes {
            let mut attrs: Vec<_> = elem.attrs.iter().collect();
            attrs.sort_by_key(|(name, _)| *name);
            for (name, value) in attrs {
                self.write_attr(name, value);
            }
        } else {
            for (name, value) in &elem.attrs {
                self.write_attr(name, value);
            }
        }

        if is_void {
            let _ = write!(self.out, ">");
            self.write_newline();
            return;
        }

        let mut children = node.children(&self.doc.arena).peekable();
        if is_foreign && children.peek().is_none() {
            let _ = write!(self.out, "/>");
            self.write_newline();
            return;
        }

        let _ = write!(self.out, ">");

        if children.peek().is_none() {
            let _ = write!(self.out, "</{tag}>");
            self.write_newline();
            return;
        }

        let child_ids: Vec<NodeId> = children.collect();
        let all_text = child_ids
            .iter()
            .all(|&child| self.doc.get(child).is_text());

        if is_raw || is_rcdata {
            for &child in &child_ids {
                if let Some(text) = self.doc.get(child).as_text() {
                    if is_raw {
                        self.write_raw_text(text, tag);
                    } else {
                        self.write_rcdata_escaped(text);
                    }
                }
            }
            let _ = write!(self.out, "</{tag}>");
            self.write_newline();
        } else if all_text {
            for &child in &child_ids {
                if let Some(text) = self.doc.get(child).as_text() {
                    self.write_text_escaped(text);
                }
            }
            let _ = write!(self.out, "</{tag}>");
            self.write_newline();
        } else {
            self.write_newline();
            self.depth += 1;
            for &child in &child_ids {
                self.write_node(child);
            }
            self.depth -= 1;
            self.write_indent();
            let _ = write!(self.out, "</{tag}>");
            self.write_newline();
        }
    }
}

impl Document {
    /// Serialize the whole document with default options.
    pub fn to_html(&self) -> String {
        serialize_document(self, &SerializeOptions::default())
    }

    /// Serialize the whole document, pretty-printed.
    pub fn to_html_pretty(&self) -> String {
        serialize_document(self, &SerializeOptions::default().pretty())
    }

    /// Serialize the whole document with custom options.
    pub fn to_html_with_options(&self, opts: &SerializeOptions) -> String {
        serialize_document(self, opts)
    }

    /// Serialized markup of `node` itself, subtree included.
    pub fn outer_html(&self, node: NodeId) -> String {
        serialize_node(self, node, &SerializeOptions::default())
    }

    /// Serialized markup of `node`'s children.
    pub fn inner_html(&self, node: NodeId) -> String {
        serialize_children(self, node, &SerializeOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn body_html(markup: &str) -> String {
        let mut doc = Document::html5();
        let body = doc.body().unwrap();
        doc.set_inner_html(body, markup).unwrap();
        doc.inner_html(body)
    }

    #[test]
    fn test_void_elements() {
        let html = body_html("<br><img src=\"test.png\">");
        assert!(html.contains("<br>"));
        assert!(!html.contains("</br>"));
        assert!(html.contains("src=\"test.png\">"));
        assert!(!html.contains("</img>"));
    }

    #[test]
    fn test_text_escaping() {
        let mut doc = Document::html5();
        let body = doc.body().unwrap();
        doc.set_text(body, "<script> & \"quotes\"");
        assert_eq!(doc.inner_html(body), "&lt;script&gt; &amp; \"quotes\"");
    }

    #[test]
    fn test_attribute_escaping() {
        let mut doc = Document::html5();
        let body = doc.body().unwrap();
        let a = doc.create("<a></a>").unwrap();
        doc.append(body, a).unwrap();
        doc.set_attr(a, "href", "test?a=1&b=2").unwrap();
        doc.set_attr(a, "title", "Say \"hello\"").unwrap();

        let html = doc.outer_html(a);
        assert!(html.contains("href=\"test?a=1&amp;b=2\""));
        assert!(html.contains("title=\"Say &quot;hello&quot;\""));
    }

    #[test]
    fn test_raw_text_not_escaped() {
        let doc = parse("<html><head><script>if (a < b && c > d) {}</script></head></html>");
        let html = doc.to_html_with_options(&SerializeOptions::default().no_escape_script_end_tags());
        assert!(html.contains("a < b && c > d"));
    }

    #[test]
    fn test_script_end_tag_escaping() {
        let mut doc = Document::html5();
        let head = doc.head().unwrap();
        let script = doc.create("<script></script>").unwrap();
        doc.append(head, script).unwrap();
        doc.set_text(script, "var x = '</script>';");

        let html = doc.to_html();
        assert!(html.contains("<\\/script"));
        assert!(!html.contains("var x = '</script>'"));
    }

    #[test]
    fn test_rcdata_elements() {
        let doc = parse("<html><head><title>Test &amp; <Demo></title></head></html>");
        let html = doc.to_html();
        assert!(html.contains("Test &amp; &lt;Demo>"));
    }

    #[test]
    fn test_comment_with_dashes() {
        let mut doc = Document::html5();
        let body = doc.body().unwrap();
        doc.set_inner_html(body, "<!--Test -- comment-->").unwrap();
        assert_eq!(doc.inner_html(body), "<!--Test - - comment-->");
    }

    #[test]
    fn test_document_serialization() {
        let doc = Document::html5();
        let html = doc.to_html();
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("<html>"));
        assert!(html.contains("</html>"));
    }

    #[test]
    fn test_pretty_print() {
        let html = {
            let mut doc = Document::html5();
            let body = doc.body().unwrap();
            doc.set_inner_html(body, "<div><p>Hello</p></div>").unwrap();
            doc.to_html_pretty()
        };
        assert!(html.contains('\n'));
        assert!(html.contains("  "));
    }

    #[test]
    fn test_sorted_attributes() {
        let mut doc = Document::html5();
        let body = doc.body().unwrap();
        let div = doc.create("<div></div>").unwrap();
        doc.append(body, div).unwrap();
        doc.set_attr(div, "zebra", "1").unwrap();
        doc.set_attr(div, "alpha", "2").unwrap();
        doc.set_attr(div, "mike", "3").unwrap();

        let html = serialize_node(&doc, div, &SerializeOptions::default().sort_attributes());
        let alpha = html.find("alpha").unwrap();
        let mike = html.find("mike").unwrap();
        let zebra = html.find("zebra").unwrap();
        assert!(alpha < mike && mike < zebra);
    }
}
