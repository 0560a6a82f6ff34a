/*!
 * Document tree access.
 *
 * The relabeling core never owns the document: it reads and writes text
 * through a `DocumentProvider`, which hides where the tree actually lives.
 *
 * - `model`: JSON-serializable in-memory document implementing the provider
 * - `walker`: pre-order traversal that rewrites every text leaf
 */

use std::ops::Range;

pub mod model;
pub mod walker;

// Re-export types used by other modules
pub use model::{ContainerNode, Document, Link, Node, NodePath, TextNode};
pub use walker::{RunReport, TreeWalker, WalkStats, relabel_document};

/// The two capabilities a node can have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Leaf with gettable and settable text
    Text,
    /// Ordered list of children
    Container,
}

/// Access to a hierarchical rich-text document.
///
/// Node handles are cheap values issued by the provider; the provider
/// decides how they resolve. Every operation can fail with the provider's
/// own error, which the core propagates unchanged.
pub trait DocumentProvider {
    /// Handle identifying a node
    type Node: Clone;

    /// Provider-level failure
    type Error;

    fn node_kind(&self, node: &Self::Node) -> Result<NodeKind, Self::Error>;

    fn text(&self, node: &Self::Node) -> Result<String, Self::Error>;

    /// Replace the whole text of a leaf
    fn set_text(&mut self, node: &Self::Node, text: String) -> Result<(), Self::Error>;

    /// Replace the half-open byte range of a leaf's text.
    ///
    /// Formatting outside the range is kept: links after it move with the
    /// text, links overlapping it are dropped.
    fn replace_range(
        &mut self,
        node: &Self::Node,
        range: Range<usize>,
        replacement: &str,
    ) -> Result<(), Self::Error>;

    /// URL of the link covering exactly `range`, if there is one
    fn link_url(&self, node: &Self::Node, range: Range<usize>) -> Result<Option<String>, Self::Error>;

    /// Attach `url` to the half-open byte range of a text node
    fn set_link_url(
        &mut self,
        node: &Self::Node,
        range: Range<usize>,
        url: &str,
    ) -> Result<(), Self::Error>;

    fn child_count(&self, node: &Self::Node) -> Result<usize, Self::Error>;

    fn child(&self, node: &Self::Node, index: usize) -> Result<Self::Node, Self::Error>;
}
