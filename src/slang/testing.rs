//! Testing helpers
//!
//! Factories for tokens and nodes, so test cases read as data instead of constructor
//! calls, plus a few checks shared by the unit and integration suites.
//!
//! ```ignore
//! let input = tokens(&[("identifier", "x"), ("operator", "="), ("number", "5")]);
//! let expected = root(vec![composite(
//!     "assignment",
//!     vec![leaf("identifier", "x"), leaf("operator", "="), leaf("number", "5")],
//! )]);
//! assert_eq!(parse(&input, Grammar::builtin())?, expected);
//! ```

use super::token::Token;
use super::tree::Node;

/// Tokens from `(type, value)` pairs.
pub fn tokens(pairs: &[(&str, &str)]) -> Vec<Token> {
    pairs.iter().copied().map(Token::from).collect()
}

pub fn leaf(kind: &str, value: &str) -> Node {
    Node::new(kind, value)
}

pub fn composite(kind: &str, children: Vec<Node>) -> Node {
    Node::composite(kind, children)
}

/// An `entry` root holding `children`.
pub fn root(children: Vec<Node>) -> Node {
    Node::root().with_children(children)
}

/// The leaves of `tree` as tokens, left to right.
pub fn leaf_tokens(tree: &Node) -> Vec<Token> {
    tree.leaves()
        .map(|node| Token::new(node.kind(), node.value()))
        .collect()
}

/// Types of the direct children of `tree`.
pub fn child_kinds(tree: &Node) -> Vec<&str> {
    tree.children().iter().map(Node::kind).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_tokens_round_trips_flat_tree() {
        let input = tokens(&[("identifier", "x"), ("separator", ";")]);
        let tree = root(input.iter().map(Node::leaf).collect());
        assert_eq!(leaf_tokens(&tree), input);
        assert_eq!(child_kinds(&tree), vec!["identifier", "separator"]);
    }
}
