//! Rewriter - one left-to-right pass over a node's children
//!
//!     A cursor walks the children of the input node. At each position every active rule
//!     is tried in grammar order against the original children. The first rule that
//!     matches has its span folded into a new composite child named after the rule, and
//!     the cursor jumps past the span. When no rule matches, the child is copied through
//!     unchanged and the cursor moves by one.
//!
//!     A pass builds a new node and leaves its input untouched. It does not descend into
//!     composite children: they are carried through as they are, and folding above them
//!     happens in later passes.

use crate::slang::grammar::{Grammar, RuleMatch};
use crate::slang::tree::{Node, Position, TreeError};

/// Applies a grammar once to the children of a node.
#[derive(Debug, Clone, Copy)]
pub struct Rewriter<'g> {
    grammar: &'g Grammar,
}

impl<'g> Rewriter<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self { grammar }
    }

    pub fn grammar(&self) -> &'g Grammar {
        self.grammar
    }

    /// Run one pass over `node`'s children with rules gated at `layer`.
    pub fn rewrite(&self, node: &Node, layer: usize) -> Result<Node, TreeError> {
        let mut result = Node::new(node.kind(), node.value());
        let mut cursor = 0;
        let mut folds = 0;

        while cursor < node.size() {
            match self.fold_at(node, cursor, layer)? {
                Some((composite, length)) => {
                    result.add_child(composite, Position::End)?;
                    cursor += length;
                    folds += 1;
                }
                None => {
                    result.add_child(node.child(cursor)?.clone(), Position::End)?;
                    cursor += 1;
                }
            }
        }

        tracing::trace!(layer, folds, children = result.size(), "rewrite pass done");
        Ok(result)
    }

    /// The composite produced by the first rule matching at `cursor`, and its length.
    fn fold_at(
        &self,
        node: &Node,
        cursor: usize,
        layer: usize,
    ) -> Result<Option<(Node, usize)>, TreeError> {
        for rule in self.grammar.rules() {
            if let RuleMatch::Matched { length, span } = rule.try_match(node, cursor, layer)? {
                tracing::trace!(rule = rule.name(), cursor, length, "fold");
                return Ok(Some((Node::composite(rule.name(), span), length)));
            }
        }
        Ok(None)
    }
}
