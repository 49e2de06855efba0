//! DOM manipulation toolkit based on indextree and html5ever.
//!
//! sapling provides:
//! - **Arena document**: all nodes of a [`Document`] live in one
//!   [`indextree`] arena, addressed by [`NodeId`]
//! - **Parsing**: browser-compatible HTML5 parsing via html5ever with full
//!   error recovery, for whole documents and detached fragments
//! - **Manipulation**: insertion, wrapping, removal, attribute / text /
//!   inner-HTML access, class toggling, inline styles
//! - **Queries**: structural selectors (`tag`, `#id`, `.class`, `[attr]`,
//!   descendant combinator) in document order
//! - **Events**: a handler registry with bubbling dispatch
//! - **Serialization**: HTML5-correct output with proper escaping
//!
//! # Example
//!
//! ```rust
//! use sapling::Document;
//!
//! let mut doc = Document::parse(
//!     "<!DOCTYPE html><html><body><div id=\"app\"></div></body></html>",
//! );
//!
//! let app = doc.find_first("#app", None).unwrap().expect("app div");
//! let item = doc.create("<p class=\"greeting\">Hello!</p>").expect("fragment");
//! doc.append(app, item).unwrap();
//!
//! assert_eq!(doc.text(app), "Hello!");
//! assert_eq!(doc.find(".greeting", None).unwrap().len(), 1);
//! ```

mod tracing_macros;

mod arena;
mod classes;
mod content;
mod error;
mod events;
mod ops;
mod parser;
pub mod query;
pub mod serialize;
mod style;
mod traverse;

pub use arena::{Document, ElementData, Namespace, NodeData, NodeKind};
pub use error::{DomError, DomResult};
pub use events::{Event, Events, Handler};
pub use parser::{parse, parse_fragment};
pub use query::Selector;
pub use serialize::{
    SerializeOptions, serialize_children, serialize_document, serialize_node,
};
pub use style::StyleDecls;
pub use traverse::each;

// Handle and text types, re-exported so callers don't need the underlying
// crates in their own dependency tables
pub use indextree::NodeId;
pub use tendril::StrTendril;
