//! Parsing module for the slang language
//!
//!     Turns the token sequence handed over by the tokenizer into a parse tree:
//!         1. Seeding: every token becomes a leaf under an `entry` root. See [initial_tree].
//!         2. Rewriting: one pass folds runs of siblings into composite nodes. See
//!            [rewriter](rewriter).
//!         3. Fixpoint: passes repeat until one changes nothing. See [fixpoint](fixpoint).
//!
//!     The stable root is handed to the evaluator, which dispatches on the types of the
//!     root's direct children. Tokens no rule could fold are still there as leaves; it is
//!     up to the evaluator to reject what it does not understand.
//!
//! Terminology
//!
//!     - pass: one left-to-right rewrite of the root's children
//!     - layer: number of passes completed before the current one; gates `min_layer` rules
//!     - fold: replacing a matched run of siblings with one composite node

pub mod fixpoint;
pub mod rewriter;

pub use fixpoint::{Converged, Fixpoint};
pub use rewriter::Rewriter;

use crate::slang::grammar::Grammar;
use crate::slang::token::Token;
use crate::slang::tree::{Node, TreeError};
use serde::{Deserialize, Serialize};

/// Errors raised while parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("grammar did not converge within {limit} passes")]
    PassLimitExceeded { limit: usize },

    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Knobs for a parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Give up after this many passes; `None` trusts the grammar to converge
    #[serde(default)]
    pub max_passes: Option<usize>,
}

/// The flat tree a parse starts from: one leaf per token under the `entry` root.
pub fn initial_tree(tokens: &[Token]) -> Node {
    Node::root().with_children(tokens.iter().map(Node::leaf).collect())
}

/// Parse `tokens` with `grammar` until the tree is stable.
pub fn parse(tokens: &[Token], grammar: &Grammar) -> Result<Node, ParseError> {
    parse_with_options(tokens, grammar, &ParseOptions::default())
}

pub fn parse_with_options(
    tokens: &[Token],
    grammar: &Grammar,
    options: &ParseOptions,
) -> Result<Node, ParseError> {
    let converged = Fixpoint::new(grammar, options.clone()).run(initial_tree(tokens))?;
    tracing::debug!(
        tokens = tokens.len(),
        passes = converged.passes,
        "parse converged"
    );
    Ok(converged.tree)
}
