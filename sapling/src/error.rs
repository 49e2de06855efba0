//! Error type for tree operations.

use thiserror::Error;

/// Result type for DOM operations.
pub type DomResult<T> = Result<T, DomError>;

/// Failures raised by tree mutation and query operations.
///
/// There is no recovery or translation layer: an operation either returns a
/// value or one of these, and callers decide what to do. Parsing never fails
/// (html5ever recovers from any input), so there is no parse variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The anchor node has no parent, so there is no sibling position to
    /// insert at (or nothing to remove from).
    #[error("node has no parent")]
    Orphan,
    /// The operation would make a node an ancestor of itself.
    #[error("node would become its own ancestor")]
    HierarchyViolation,
    /// The operation only makes sense on an element node.
    #[error("node is not an element")]
    NotAnElement,
    /// The selector string could not be parsed.
    #[error("invalid selector: {0}")]
    Selector(String),
}
