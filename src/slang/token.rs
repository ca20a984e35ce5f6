//! Tokens
//!
//! The tokenizer is an external collaborator: it classifies raw text into `(type, value)`
//! pairs and hands them over in source order. The parser never looks at source text, only
//! at these pairs, so a token carries nothing else (no spans, no positions).
//!
//! On the wire a token is `{"type": "...", "value": "..."}`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single classified lexical unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// The token type tag, e.g. `identifier` or `operator`
    #[serde(rename = "type")]
    pub kind: String,
    /// The literal text of the token
    pub value: String,
}

impl Token {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

impl From<(&str, &str)> for Token {
    fn from((kind, value): (&str, &str)) -> Self {
        Token::new(kind, value)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.kind, self.value)
    }
}
