//! Inline style access over the `style` attribute.
//!
//! Declarations are an ordered `(property, value)` list, parsed from the
//! attribute on every call and written back after mutation; the attribute is
//! the only storage.

use std::fmt;

use indextree::NodeId;

use crate::arena::Document;
use crate::error::DomResult;

/// An ordered list of inline style declarations.
///
/// `set` updates an existing property in place or appends a new one, so
/// declaration order is stable across updates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDecls {
    entries: Vec<(String, String)>,
}

impl StyleDecls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the contents of a `style` attribute.
    ///
    /// Declarations without a `:` are dropped, the same tolerance browsers
    /// apply to inline styles.
    pub fn parse(input: &str) -> Self {
        let mut decls = Self::new();
        for declaration in input.split(';') {
            if let Some((name, value)) = declaration.split_once(':') {
                let (name, value) = (name.trim(), value.trim());
                if !name.is_empty() {
                    decls.set(name, value);
                }
            }
        }
        decls
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, name: &str, value: &str) {
        if let Some((_, v)) = self.entries.iter_mut().find(|(n, _)| n == name) {
            *v = value.to_string();
        } else {
            self.entries.push((name.to_string(), value.to_string()));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for StyleDecls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}

impl Document {
    /// Current value of one inline style property, or `None` if the property
    /// (or the whole `style` attribute) is unset.
    pub fn style(&self, node: NodeId, name: &str) -> Option<String> {
        let decls = StyleDecls::parse(self.attr(node, "style")?);
        decls.get(name).map(str::to_string)
    }

    /// Set one inline style property.
    pub fn set_style(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.set_styles(node, [(name, value)])
    }

    /// Apply several style properties, in the given order.
    pub fn set_styles<'a, I>(&mut self, node: NodeId, properties: I) -> DomResult<()>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut decls = self
            .attr(node, "style")
            .map(StyleDecls::parse)
            .unwrap_or_default();
        for (name, value) in properties {
            decls.set(name, value);
        }
        self.set_attr(node, "style", &decls.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let decls = StyleDecls::parse("color: red; border:1px solid green ;;");
        assert_eq!(decls.get("color"), Some("red"));
        assert_eq!(decls.get("border"), Some("1px solid green"));
        assert_eq!(decls.len(), 2);
        assert_eq!(decls.to_string(), "color: red; border: 1px solid green");
    }

    #[test]
    fn test_parse_drops_malformed() {
        let decls = StyleDecls::parse("nonsense; color: red");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls.get("color"), Some("red"));
    }

    #[test]
    fn test_set_keeps_order() {
        let mut decls = StyleDecls::parse("color: red; background: #333");
        decls.set("color", "blue");
        assert_eq!(decls.to_string(), "color: blue; background: #333");
    }

    #[test]
    fn test_document_style_roundtrip() {
        let mut doc = Document::html5();
        let body = doc.body().unwrap();

        assert_eq!(doc.style(body, "background"), None);
        doc.set_style(body, "background", "#333").unwrap();
        assert_eq!(doc.style(body, "background"), Some("#333".to_string()));
        assert_eq!(doc.attr(body, "style"), Some("background: #333"));
    }

    #[test]
    fn test_set_styles_applies_in_order() {
        let mut doc = Document::html5();
        let body = doc.body().unwrap();

        doc.set_styles(body, [("color", "red"), ("border", "1px solid green")])
            .unwrap();
        assert_eq!(
            doc.attr(body, "style"),
            Some("color: red; border: 1px solid green")
        );

        // later application updates in place, keeping declaration order
        doc.set_styles(body, [("color", "#ff0")]).unwrap();
        assert_eq!(
            doc.attr(body, "style"),
            Some("color: #ff0; border: 1px solid green")
        );
    }
}
