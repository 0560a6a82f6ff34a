/*!
 * In-memory document model.
 *
 * A JSON-serializable tree of containers and text leaves. It is the
 * document format the command line tool reads and writes, and the provider
 * the tests drive the walker with.
 */

use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::{DocumentProvider, NodeKind};
use crate::errors::DocumentError;
use crate::file_utils::FileManager;

/// Complete document: optional title and a root node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub body: Node,
}

/// A node of the document tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Text(TextNode),
    Container(ContainerNode),
}

/// Leaf carrying text and its hyperlinks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TextNode {
    pub text: String,

    /// Links sorted by start, never overlapping
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

/// Inner node with ordered children
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ContainerNode {
    /// Free-form element name (paragraph, table, cell...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub children: Vec<Node>,
}

/// Hyperlink over the half-open byte range `start..end`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub start: usize,
    pub end: usize,
    pub url: String,
}

impl Link {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(TextNode {
            text: text.into(),
            links: Vec::new(),
        })
    }

    pub fn container(children: Vec<Node>) -> Self {
        Node::Container(ContainerNode {
            name: None,
            children,
        })
    }

    pub fn named_container(name: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Container(ContainerNode {
            name: Some(name.into()),
            children,
        })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Text(_) => NodeKind::Text,
            Node::Container(_) => NodeKind::Container,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Node::Text(text) => Some(text),
            Node::Container(_) => None,
        }
    }

    /// Concatenated text of all leaves, in document order
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&text.text),
            Node::Container(container) => {
                for child in &container.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Location of a node as child indices from the document body
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

impl Document {
    pub fn new(body: Node) -> Self {
        Self { title: None, body }
    }

    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(json).map_err(|e| DocumentError::Parse(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| DocumentError::Parse(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|e| DocumentError::Parse(e.to_string()))
    }

    /// Write the document as pretty-printed JSON, creating parent directories
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json_string()?;
        FileManager::write_to_file(path, &json)
    }

    pub fn root(&self) -> NodePath {
        NodePath::root()
    }

    /// Resolve a path to a node
    pub fn node(&self, path: &NodePath) -> Result<&Node, DocumentError> {
        let mut node = &self.body;
        for &index in path.indices() {
            node = match node {
                Node::Container(container) => container
                    .children
                    .get(index)
                    .ok_or_else(|| DocumentError::NodeNotFound(path.to_string()))?,
                Node::Text(_) => return Err(DocumentError::NodeNotFound(path.to_string())),
            };
        }
        Ok(node)
    }

    fn node_mut(&mut self, path: &NodePath) -> Result<&mut Node, DocumentError> {
        let mut node = &mut self.body;
        for &index in path.indices() {
            node = match node {
                Node::Container(container) => container
                    .children
                    .get_mut(index)
                    .ok_or_else(|| DocumentError::NodeNotFound(path.to_string()))?,
                Node::Text(_) => return Err(DocumentError::NodeNotFound(path.to_string())),
            };
        }
        Ok(node)
    }

    fn text_node(&self, path: &NodePath) -> Result<&TextNode, DocumentError> {
        match self.node(path)? {
            Node::Text(text) => Ok(text),
            Node::Container(_) => Err(wrong_kind(path, "text")),
        }
    }

    fn text_node_mut(&mut self, path: &NodePath) -> Result<&mut TextNode, DocumentError> {
        match self.node_mut(path)? {
            Node::Text(text) => Ok(text),
            Node::Container(_) => Err(wrong_kind(path, "text")),
        }
    }

    fn container_node(&self, path: &NodePath) -> Result<&ContainerNode, DocumentError> {
        match self.node(path)? {
            Node::Container(container) => Ok(container),
            Node::Text(_) => Err(wrong_kind(path, "container")),
        }
    }
}

fn wrong_kind(path: &NodePath, expected: &'static str) -> DocumentError {
    DocumentError::WrongNodeKind {
        path: path.to_string(),
        expected,
    }
}

fn invalid_range(path: &NodePath, range: &Range<usize>, text: &str) -> DocumentError {
    DocumentError::InvalidRange {
        path: path.to_string(),
        start: range.start,
        end: range.end,
        len: text.len(),
    }
}

impl DocumentProvider for Document {
    type Node = NodePath;
    type Error = DocumentError;

    fn node_kind(&self, node: &NodePath) -> Result<NodeKind, DocumentError> {
        Ok(self.node(node)?.kind())
    }

    fn text(&self, node: &NodePath) -> Result<String, DocumentError> {
        Ok(self.text_node(node)?.text.clone())
    }

    /// Replace the content. Existing links are dropped: their offsets refer
    /// to the old text.
    fn set_text(&mut self, node: &NodePath, text: String) -> Result<(), DocumentError> {
        let leaf = self.text_node_mut(node)?;
        leaf.text = text;
        leaf.links.clear();
        Ok(())
    }

    fn replace_range(
        &mut self,
        node: &NodePath,
        range: Range<usize>,
        replacement: &str,
    ) -> Result<(), DocumentError> {
        let leaf = self.text_node_mut(node)?;
        if leaf.text.get(range.clone()).is_none() {
            return Err(invalid_range(node, &range, &leaf.text));
        }

        leaf.text.replace_range(range.clone(), replacement);
        let delta = replacement.len() as isize - range.len() as isize;
        leaf.links
            .retain(|link| link.end <= range.start || link.start >= range.end);
        for link in leaf.links.iter_mut().filter(|link| link.start >= range.end) {
            link.start = link.start.saturating_add_signed(delta);
            link.end = link.end.saturating_add_signed(delta);
        }
        Ok(())
    }

    fn link_url(&self, node: &NodePath, range: Range<usize>) -> Result<Option<String>, DocumentError> {
        let leaf = self.text_node(node)?;
        Ok(leaf
            .links
            .iter()
            .find(|link| link.range() == range)
            .map(|link| link.url.clone()))
    }

    fn set_link_url(
        &mut self,
        node: &NodePath,
        range: Range<usize>,
        url: &str,
    ) -> Result<(), DocumentError> {
        let leaf = self.text_node_mut(node)?;
        if range.is_empty() || leaf.text.get(range.clone()).is_none() {
            return Err(invalid_range(node, &range, &leaf.text));
        }

        leaf.links
            .retain(|link| link.end <= range.start || link.start >= range.end);
        let position = leaf.links.partition_point(|link| link.start < range.start);
        leaf.links.insert(
            position,
            Link {
                start: range.start,
                end: range.end,
                url: url.to_string(),
            },
        );
        Ok(())
    }

    fn child_count(&self, node: &NodePath) -> Result<usize, DocumentError> {
        Ok(self.container_node(node)?.children.len())
    }

    fn child(&self, node: &NodePath, index: usize) -> Result<NodePath, DocumentError> {
        let container = self.container_node(node)?;
        if index >= container.children.len() {
            return Err(DocumentError::NodeNotFound(node.child(index).to_string()));
        }
        Ok(node.child(index))
    }
}
