//! Rules
//!
//!     A rule names the composite node it produces and describes the run of siblings it
//!     folds. Most rules are an ordered list of atoms; a rule can instead be a regular
//!     expression tested against the value of a single node.
//!
//!     Matching a rule at `start` evaluates each atom against the child at
//!     `start + offset`, where `offset` is the number of siblings consumed so far. A rule
//!     whose next atom would look past the last child fails, even if that atom is optional.

use super::atom::Atom;
use super::GrammarError;
use crate::slang::tree::{Node, TreeError};
use regex::Regex;

/// What a rule matches.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Ordered atoms, each consuming zero or more siblings
    Atoms(Vec<Atom>),
    /// A regular expression that must match the whole value of one node
    Regex(Regex),
}

/// Outcome of matching a rule at a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatch {
    /// The rule consumed `length` siblings; `span` is a copy of them in order
    Matched { length: usize, span: Vec<Node> },
    NotMatched,
}

impl RuleMatch {
    pub fn is_match(&self) -> bool {
        matches!(self, RuleMatch::Matched { .. })
    }
}

/// A named grammar production.
#[derive(Debug, Clone)]
pub struct Rule {
    name: String,
    pattern: Pattern,
    min_layer: usize,
}

impl Rule {
    /// A rule built from atom notation, see [atom](super::atom).
    pub fn new<I, S>(name: impl Into<String>, atoms: I) -> Result<Self, GrammarError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();
        let atoms = atoms
            .into_iter()
            .map(|spec| Atom::parse(spec.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| GrammarError::InvalidAtom {
                rule: name.clone(),
                source,
            })?;
        if atoms.is_empty() {
            return Err(GrammarError::EmptyRule(name));
        }
        Ok(Self {
            name,
            pattern: Pattern::Atoms(atoms),
            min_layer: 0,
        })
    }

    /// A rule matching one node whose whole value matches `pattern`.
    pub fn regex(name: impl Into<String>, pattern: &str) -> Result<Self, GrammarError> {
        let name = name.into();
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
            GrammarError::InvalidRegex {
                rule: name.clone(),
                source,
            }
        })?;
        Ok(Self {
            name,
            pattern: Pattern::Regex(regex),
            min_layer: 0,
        })
    }

    /// Only apply this rule once `min_layer` passes have completed.
    pub fn with_min_layer(mut self, min_layer: usize) -> Self {
        self.min_layer = min_layer;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn min_layer(&self) -> usize {
        self.min_layer
    }

    pub fn is_active(&self, layer: usize) -> bool {
        layer >= self.min_layer
    }

    /// Try to match this rule against the children of `parent`, starting at `start`.
    ///
    /// Running off the end of the children is a failed match, not an error. A match that
    /// consumes no node is also reported as `NotMatched`: folding an empty run would
    /// produce an empty composite without moving the rewrite cursor.
    pub fn try_match(
        &self,
        parent: &Node,
        start: usize,
        layer: usize,
    ) -> Result<RuleMatch, TreeError> {
        if !self.is_active(layer) {
            return Ok(RuleMatch::NotMatched);
        }

        let length = match &self.pattern {
            Pattern::Atoms(atoms) => {
                let mut offset = 0;
                for atom in atoms {
                    let Ok(at) = parent.child_ref(start + offset) else {
                        return Ok(RuleMatch::NotMatched);
                    };
                    match atom.evaluate(at)? {
                        Some(consumed) => offset += consumed,
                        None => return Ok(RuleMatch::NotMatched),
                    }
                }
                offset
            }
            Pattern::Regex(regex) => match parent.child(start) {
                Ok(node) if regex.is_match(node.value()) => 1,
                _ => return Ok(RuleMatch::NotMatched),
            },
        };

        if length == 0 {
            return Ok(RuleMatch::NotMatched);
        }
        Ok(RuleMatch::Matched {
            length,
            span: parent.slice(start, start + length)?,
        })
    }
}
