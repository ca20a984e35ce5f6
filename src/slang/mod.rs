//! Main module for slang library functionality

pub mod grammar;
pub mod parsing;
pub mod testing;
pub mod token;
pub mod tree;

pub use grammar::{Grammar, GrammarError, Rule};
pub use parsing::{parse, parse_with_options, ParseError, ParseOptions};
pub use token::Token;
pub use tree::{Node, NodeRef, Position, TreeError};
