//! Parse tree
//!
//!     The tree is both the input and the output of every rewrite pass. It starts out as an
//!     `entry` root holding one leaf per token, and every pass builds a brand-new tree in
//!     which some runs of siblings have been moved under a composite node named after the
//!     rule that matched them.
//!
//!     Nodes are plain values: a node owns its children and knows nothing about its parent.
//!     Quantifier matching still needs to ask "what is the next sibling", so that context is
//!     carried by a [`NodeRef`] cursor (node, parent, index) that is built while traversing
//!     and dropped with the borrow. Rebuilding the tree can therefore never leave a stale
//!     parent link behind.
//!
//!     Leaf nodes wrap exactly one token. Composite nodes have an empty value and at least
//!     one child, in original left-to-right order.

use super::token::Token;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

/// Type and value of the root node of every parse.
pub const ENTRY: &str = "entry";

/// Errors raised by tree access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("child index {index} out of range for node with {len} children")]
    OutOfRange { index: usize, len: usize },

    #[error("invalid child slice {begin}..{end} for node with {len} children")]
    InvalidSlice { begin: usize, end: usize, len: usize },

    #[error("cannot get the sibling of a node without a parent")]
    NoParent,
}

/// Where [`Node::add_child`] puts the new child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    /// Append after the last child
    #[default]
    End,
    /// Insert before the child currently at this index
    At(usize),
}

/// A node of the parse tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    kind: String,
    value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
}

impl Node {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            children: Vec::new(),
        }
    }

    /// The `entry` root every parse starts from.
    pub fn root() -> Self {
        Self::new(ENTRY, ENTRY)
    }

    /// A leaf wrapping one token.
    pub fn leaf(token: &Token) -> Self {
        Self::new(token.kind.clone(), token.value.clone())
    }

    /// A composite node owning `children`; composite nodes carry no value.
    pub fn composite(kind: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            kind: kind.into(),
            value: String::new(),
            children,
        }
    }

    /// Replace the children of this node.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn into_children(self) -> Vec<Node> {
        self.children
    }

    /// Number of direct children.
    pub fn size(&self) -> usize {
        self.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Levels of nesting below this node; a leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Add a child at `position` and return it.
    pub fn add_child(&mut self, node: Node, position: Position) -> Result<&mut Node, TreeError> {
        let index = match position {
            Position::End => self.children.len(),
            Position::At(index) if index <= self.children.len() => index,
            Position::At(index) => {
                return Err(TreeError::OutOfRange {
                    index,
                    len: self.children.len(),
                })
            }
        };
        self.children.insert(index, node);
        Ok(&mut self.children[index])
    }

    /// Remove and return the child at `index`.
    pub fn remove_child(&mut self, index: usize) -> Result<Node, TreeError> {
        self.check_index(index)?;
        Ok(self.children.remove(index))
    }

    pub fn child(&self, index: usize) -> Result<&Node, TreeError> {
        self.check_index(index)?;
        Ok(&self.children[index])
    }

    pub fn child_mut(&mut self, index: usize) -> Result<&mut Node, TreeError> {
        self.check_index(index)?;
        Ok(&mut self.children[index])
    }

    /// A cursor on the child at `index`, able to walk to its next siblings.
    pub fn child_ref(&self, index: usize) -> Result<NodeRef<'_>, TreeError> {
        Ok(NodeRef {
            node: self.child(index)?,
            parent: Some(self),
            index,
        })
    }

    /// First direct child satisfying `pred`.
    pub fn find_child<P>(&self, mut pred: P) -> Option<&Node>
    where
        P: FnMut(&Node) -> bool,
    {
        self.children.iter().find(|child| pred(child))
    }

    /// Copy of the children in `begin..end`.
    pub fn slice(&self, begin: usize, end: usize) -> Result<Vec<Node>, TreeError> {
        self.children
            .get(begin..end)
            .map(<[Node]>::to_vec)
            .ok_or(TreeError::InvalidSlice {
                begin,
                end,
                len: self.children.len(),
            })
    }

    /// Recursive structural equality over type, value and children.
    ///
    /// This is the fixpoint termination test: two trees are equal when neither differs in
    /// any node's type, value or child sequence.
    pub fn deep_equals(&self, other: &Node) -> bool {
        self == other
    }

    /// Leaves below this node, left to right.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves {
            stack: vec![self.children.iter()],
        }
    }

    /// Indented dump of the tree, one node per line.
    ///
    /// ```text
    /// entry: entry
    ///   assignment
    ///     identifier: x
    ///     operator: =
    ///     number: 5
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&self.kind);
        if !self.value.is_empty() {
            out.push_str(": ");
            out.push_str(&escape_value(&self.value));
        }
        out.push('\n');
        for child in &self.children {
            child.render_into(out, depth + 1);
        }
    }

    /// Serialize the tree for an evaluator living outside this crate.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn check_index(&self, index: usize) -> Result<(), TreeError> {
        if index < self.children.len() {
            Ok(())
        } else {
            Err(TreeError::OutOfRange {
                index,
                len: self.children.len(),
            })
        }
    }
}

impl From<&Token> for Node {
    fn from(token: &Token) -> Self {
        Node::leaf(token)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Keeps control characters from breaking the one-node-per-line layout.
fn escape_value(value: &str) -> Cow<'_, str> {
    if !value.contains(|c| matches!(c, '\n' | '\r' | '\t')) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        value
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t"),
    )
}

/// Traversal cursor: a node together with its parent and its index among its siblings.
///
/// A cursor is only as long-lived as the borrow of the tree it points into, so it can
/// never outlive a pass that rebuilds the tree.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    node: &'a Node,
    parent: Option<&'a Node>,
    index: usize,
}

impl<'a> NodeRef<'a> {
    /// A cursor on a node without a parent.
    pub fn root(node: &'a Node) -> Self {
        Self {
            node,
            parent: None,
            index: 0,
        }
    }

    pub fn node(&self) -> &'a Node {
        self.node
    }

    pub fn parent(&self) -> Option<&'a Node> {
        self.parent
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The next sibling, or `None` when this is the last child of its parent.
    pub fn next_sibling(&self) -> Result<Option<NodeRef<'a>>, TreeError> {
        let parent = self.parent.ok_or(TreeError::NoParent)?;
        let index = self.index + 1;
        Ok(parent.children.get(index).map(|node| NodeRef {
            node,
            parent: Some(parent),
            index,
        }))
    }
}

impl Deref for NodeRef<'_> {
    type Target = Node;

    fn deref(&self) -> &Node {
        self.node
    }
}

/// Iterator over the leaves of a tree, see [`Node::leaves`].
pub struct Leaves<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(node) if node.is_leaf() => return Some(node),
                Some(node) => self.stack.push(node.children.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
