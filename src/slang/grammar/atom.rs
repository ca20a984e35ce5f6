//! Atoms - the smallest unit of a grammar rule
//!
//!     An atom constrains one position of a rule. It names a token type, optionally a value
//!     the node must (or must not) carry, and optionally a quantifier saying how many
//!     consecutive siblings the position may absorb.
//!
//! Notation
//!
//!     type            node of this type
//!     type:value      node of this type whose value is `value`
//!     type;value      node of this type whose value is anything but `value`
//!     a|b|c           first alternative that matches wins
//!     type?           zero or one
//!     type*           zero or more
//!     type+           one or more
//!
//!     The quantifier sits on the type name (`separator+`, `operator?:=`), so a literal value
//!     such as `operator:+` is a plain value. All alternatives share one quantifier: an
//!     alternative without a suffix inherits the one written on its neighbours.
//!
//!     A backslash makes the next character literal, e.g. `operator:\|` or `weird\+type`.
//!
//! Matching
//!
//!     Evaluation starts at a cursor and reports how many siblings the atom consumed.
//!     Quantified runs walk `next_sibling()` and stop at the first node that does not match
//!     or at the end of the parent's children; a run never leaves its parent.
//!
//!     `*` counts the starting node only if it matches, then keeps counting the siblings
//!     after it whether or not the start matched. `+` fails on a mismatching start.

use crate::slang::tree::{Node, NodeRef, TreeError};
use std::fmt;
use std::str::FromStr;

const ALTERNATION: char = '|';
const EQUALS: char = ':';
const NOT_EQUALS: char = ';';
const ESCAPE: char = '\\';

/// Errors raised while parsing atom notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AtomError {
    #[error("empty atom")]
    Empty,

    #[error("atom `{0}` has an empty alternative")]
    EmptyAlternative(String),

    #[error("atom `{0}` has an alternative without a token type")]
    MissingType(String),

    #[error("atom `{0}` ends with a dangling escape")]
    DanglingEscape(String),

    #[error("atom `{0}` mixes different quantifiers")]
    ConflictingQuantifiers(String),
}

/// How many consecutive siblings an atom may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quantifier {
    #[default]
    ExactlyOne,
    /// `?`
    ZeroOrOne,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
}

impl Quantifier {
    fn from_suffix(c: char) -> Option<Self> {
        match c {
            '?' => Some(Quantifier::ZeroOrOne),
            '*' => Some(Quantifier::ZeroOrMore),
            '+' => Some(Quantifier::OneOrMore),
            _ => None,
        }
    }

    fn suffix(self) -> Option<char> {
        match self {
            Quantifier::ExactlyOne => None,
            Quantifier::ZeroOrOne => Some('?'),
            Quantifier::ZeroOrMore => Some('*'),
            Quantifier::OneOrMore => Some('+'),
        }
    }

    /// Whether the atom succeeds without consuming anything.
    pub fn allows_empty(self) -> bool {
        matches!(self, Quantifier::ZeroOrOne | Quantifier::ZeroOrMore)
    }
}

/// Constraint on a node's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueConstraint {
    Any,
    Equals(String),
    NotEquals(String),
}

/// One alternative of an atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub kind: String,
    pub value: ValueConstraint,
}

impl Constraint {
    pub fn matches(&self, node: &Node) -> bool {
        if node.kind() != self.kind {
            return false;
        }
        match &self.value {
            ValueConstraint::Any => true,
            ValueConstraint::Equals(value) => node.value() == value,
            ValueConstraint::NotEquals(value) => node.value() != value,
        }
    }

    /// Length of the run of matching siblings starting at `start`.
    fn run_length(&self, start: NodeRef<'_>) -> Result<usize, TreeError> {
        if !self.matches(start.node()) {
            return Ok(0);
        }
        Ok(1 + self.following_run(start)?)
    }

    /// Matching siblings after `start`, up to the first mismatch. `start` itself is not
    /// looked at.
    fn following_run(&self, start: NodeRef<'_>) -> Result<usize, TreeError> {
        let mut consumed = 0;
        let mut cursor = start.next_sibling()?;
        while let Some(current) = cursor {
            if !self.matches(current.node()) {
                break;
            }
            consumed += 1;
            cursor = current.next_sibling()?;
        }
        Ok(consumed)
    }
}

/// A parsed atom: ordered alternatives sharing one quantifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    alternatives: Vec<Constraint>,
    quantifier: Quantifier,
}

impl Atom {
    pub fn parse(spec: &str) -> Result<Self, AtomError> {
        spec.parse()
    }

    pub fn alternatives(&self) -> &[Constraint] {
        &self.alternatives
    }

    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    /// Whether any alternative accepts `node`, ignoring the quantifier.
    pub fn matches(&self, node: &Node) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(node))
    }

    /// Evaluate the atom at `at`.
    ///
    /// Returns `Some(consumed)` on success and `None` when the atom fails. Alternatives are
    /// tried in order and the first one that consumes at least one node decides the length;
    /// alternatives are never combined into one run. When nothing is consumed, `?` and `*`
    /// still succeed with a length of zero.
    pub fn evaluate(&self, at: NodeRef<'_>) -> Result<Option<usize>, TreeError> {
        for alternative in &self.alternatives {
            let consumed = match self.quantifier {
                Quantifier::ExactlyOne | Quantifier::ZeroOrOne => {
                    usize::from(alternative.matches(at.node()))
                }
                Quantifier::ZeroOrMore => {
                    usize::from(alternative.matches(at.node())) + alternative.following_run(at)?
                }
                Quantifier::OneOrMore => alternative.run_length(at)?,
            };
            if consumed > 0 {
                return Ok(Some(consumed));
            }
        }
        Ok(self.quantifier.allows_empty().then_some(0))
    }
}

/// A character of atom notation and whether it was escaped.
type Unit = (char, bool);

fn scan(spec: &str) -> Result<Vec<Unit>, AtomError> {
    let mut units = Vec::with_capacity(spec.len());
    let mut chars = spec.chars();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            let escaped = chars
                .next()
                .ok_or_else(|| AtomError::DanglingEscape(spec.to_string()))?;
            units.push((escaped, true));
        } else {
            units.push((c, false));
        }
    }
    Ok(units)
}

fn parse_alternative(
    spec: &str,
    units: &[Unit],
) -> Result<(Constraint, Option<Quantifier>), AtomError> {
    if units.is_empty() {
        return Err(AtomError::EmptyAlternative(spec.to_string()));
    }

    let split = units
        .iter()
        .position(|&(c, escaped)| !escaped && (c == EQUALS || c == NOT_EQUALS));
    let (mut type_units, value) = match split {
        Some(at) => {
            let text: String = units[at + 1..].iter().map(|&(c, _)| c).collect();
            // `type:` with nothing after it constrains nothing
            let value = match (units[at].0, text.is_empty()) {
                (_, true) => ValueConstraint::Any,
                (EQUALS, false) => ValueConstraint::Equals(text),
                (_, false) => ValueConstraint::NotEquals(text),
            };
            (&units[..at], value)
        }
        None => (units, ValueConstraint::Any),
    };

    let mut quantifier = None;
    if let Some((&(last, false), rest)) = type_units.split_last() {
        if let Some(q) = Quantifier::from_suffix(last) {
            quantifier = Some(q);
            type_units = rest;
        }
    }
    if type_units.is_empty() {
        return Err(AtomError::MissingType(spec.to_string()));
    }

    let kind = type_units.iter().map(|&(c, _)| c).collect();
    Ok((Constraint { kind, value }, quantifier))
}

impl FromStr for Atom {
    type Err = AtomError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        if spec.is_empty() {
            return Err(AtomError::Empty);
        }
        let units = scan(spec)?;

        let mut alternatives = Vec::new();
        let mut shared: Option<Quantifier> = None;
        for part in units.split(|&(c, escaped)| c == ALTERNATION && !escaped) {
            let (constraint, quantifier) = parse_alternative(spec, part)?;
            match (shared, quantifier) {
                (_, None) => {}
                (None, Some(q)) => shared = Some(q),
                (Some(prev), Some(q)) if prev == q => {}
                (Some(_), Some(_)) => {
                    return Err(AtomError::ConflictingQuantifiers(spec.to_string()))
                }
            }
            alternatives.push(constraint);
        }

        Ok(Atom {
            alternatives,
            quantifier: shared.unwrap_or_default(),
        })
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for c in text.chars() {
        if matches!(c, '\\' | '|' | ':' | ';' | '?' | '*' | '+') {
            write!(f, "\\")?;
        }
        write!(f, "{c}")?;
    }
    Ok(())
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, alt) in self.alternatives.iter().enumerate() {
            if i > 0 {
                write!(f, "{ALTERNATION}")?;
            }
            write_escaped(f, &alt.kind)?;
            if let Some(suffix) = self.quantifier.suffix() {
                write!(f, "{suffix}")?;
            }
            match &alt.value {
                ValueConstraint::Any => {}
                ValueConstraint::Equals(value) => {
                    write!(f, "{EQUALS}")?;
                    write_escaped(f, value)?;
                }
                ValueConstraint::NotEquals(value) => {
                    write!(f, "{NOT_EQUALS}")?;
                    write_escaped(f, value)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slang::tree::Position;
    use rstest::rstest;

    fn siblings(nodes: &[(&str, &str)]) -> Node {
        let mut parent = Node::root();
        for (kind, value) in nodes {
            parent.add_child(Node::new(*kind, *value), Position::End).unwrap();
        }
        parent
    }

    fn eval(spec: &str, parent: &Node, at: usize) -> Option<usize> {
        let atom = Atom::parse(spec).unwrap();
        atom.evaluate(parent.child_ref(at).unwrap()).unwrap()
    }

    #[rstest]
    #[case("identifier", "identifier", ValueConstraint::Any, Quantifier::ExactlyOne)]
    #[case("operator:=", "operator", ValueConstraint::Equals("=".into()), Quantifier::ExactlyOne)]
    #[case("operator;=", "operator", ValueConstraint::NotEquals("=".into()), Quantifier::ExactlyOne)]
    #[case("separator+", "separator", ValueConstraint::Any, Quantifier::OneOrMore)]
    #[case("separator*", "separator", ValueConstraint::Any, Quantifier::ZeroOrMore)]
    #[case("operator?:=", "operator", ValueConstraint::Equals("=".into()), Quantifier::ZeroOrOne)]
    #[case("operator:+", "operator", ValueConstraint::Equals("+".into()), Quantifier::ExactlyOne)]
    #[case("operator:\\|", "operator", ValueConstraint::Equals("|".into()), Quantifier::ExactlyOne)]
    #[case("weird\\+", "weird+", ValueConstraint::Any, Quantifier::ExactlyOne)]
    #[case("number:", "number", ValueConstraint::Any, Quantifier::ExactlyOne)]
    fn test_parse_single_alternative(
        #[case] spec: &str,
        #[case] kind: &str,
        #[case] value: ValueConstraint,
        #[case] quantifier: Quantifier,
    ) {
        let atom = Atom::parse(spec).unwrap();
        assert_eq!(atom.alternatives().len(), 1);
        assert_eq!(atom.alternatives()[0].kind, kind);
        assert_eq!(atom.alternatives()[0].value, value);
        assert_eq!(atom.quantifier(), quantifier);
    }

    #[test]
    fn test_parse_alternation_shares_quantifier() {
        let atom = Atom::parse("number|identifier+").unwrap();
        let kinds: Vec<&str> = atom.alternatives().iter().map(|a| a.kind.as_str()).collect();
        assert_eq!(kinds, vec!["number", "identifier"]);
        assert_eq!(atom.quantifier(), Quantifier::OneOrMore);
    }

    #[rstest]
    #[case("", AtomError::Empty)]
    #[case("a||b", AtomError::EmptyAlternative("a||b".into()))]
    #[case(":x", AtomError::MissingType(":x".into()))]
    #[case("+", AtomError::MissingType("+".into()))]
    #[case("a\\", AtomError::DanglingEscape("a\\".into()))]
    #[case("a+|b*", AtomError::ConflictingQuantifiers("a+|b*".into()))]
    fn test_parse_errors(#[case] spec: &str, #[case] expected: AtomError) {
        assert_eq!(Atom::parse(spec).unwrap_err(), expected);
    }

    #[rstest]
    #[case("identifier")]
    #[case("operator;=")]
    #[case("identifier+|number+")]
    #[case("operator:\\|")]
    #[case("operator?:=")]
    fn test_display_is_reparseable(#[case] spec: &str) {
        let atom = Atom::parse(spec).unwrap();
        assert_eq!(Atom::parse(&atom.to_string()).unwrap(), atom);
    }

    #[test]
    fn test_plain_atom_consumes_one() {
        let parent = siblings(&[("identifier", "x"), ("operator", "=")]);
        assert_eq!(eval("identifier", &parent, 0), Some(1));
        assert_eq!(eval("number", &parent, 0), None);
        assert_eq!(eval("operator:=", &parent, 1), Some(1));
        assert_eq!(eval("operator;=", &parent, 1), None);
        assert_eq!(eval("operator:+", &parent, 1), None);
    }

    #[test]
    fn test_alternation_first_match_wins() {
        let parent = siblings(&[("number", "5")]);
        assert_eq!(eval("identifier|number|string", &parent, 0), Some(1));
        assert_eq!(eval("identifier|string", &parent, 0), None);
    }

    #[test]
    fn test_alternatives_are_not_combined_into_one_run() {
        let parent = siblings(&[("number", "1"), ("identifier", "x"), ("identifier", "y")]);
        assert_eq!(eval("identifier+|number+", &parent, 0), Some(1));
        assert_eq!(eval("identifier+|number+", &parent, 1), Some(2));
    }

    #[test]
    fn test_zero_or_one() {
        let parent = siblings(&[("operator", "="), ("operator", "=")]);
        assert_eq!(eval("operator?", &parent, 0), Some(1));
        assert_eq!(eval("number?", &parent, 0), Some(0));
    }

    #[test]
    fn test_zero_or_more_stops_at_first_mismatch() {
        let parent = siblings(&[
            ("separator", "\n"),
            ("separator", ";"),
            ("identifier", "x"),
            ("separator", ";"),
        ]);
        assert_eq!(eval("separator*", &parent, 0), Some(2));
        assert_eq!(eval("separator*", &parent, 3), Some(1));
        assert_eq!(eval("number*", &parent, 3), Some(0));
    }

    #[test]
    fn test_zero_or_more_counts_siblings_after_a_mismatching_start() {
        let parent = siblings(&[("identifier", "x"), ("separator", ";"), ("separator", ";")]);
        assert_eq!(eval("separator*", &parent, 0), Some(2));
        assert_eq!(eval("separator+", &parent, 0), None);
        assert_eq!(eval("number*", &parent, 0), Some(0));
    }

    #[test]
    fn test_zero_or_more_run_after_mismatch_stops_at_next_mismatch() {
        let parent = siblings(&[
            ("identifier", "x"),
            ("separator", ";"),
            ("identifier", "y"),
            ("separator", ";"),
        ]);
        assert_eq!(eval("separator*", &parent, 0), Some(1));
        assert_eq!(eval("number|separator*", &parent, 2), Some(1));
    }

    #[test]
    fn test_one_or_more_runs_to_end_of_siblings() {
        let parent = siblings(&[("separator", "\n"), ("separator", "\n"), ("separator", ";")]);
        assert_eq!(eval("separator+", &parent, 0), Some(3));
        assert_eq!(eval("separator+", &parent, 2), Some(1));
        assert_eq!(eval("number+", &parent, 0), None);
    }

    #[test]
    fn test_value_constraint_applies_to_every_node_of_a_run() {
        let parent = siblings(&[("separator", "\n"), ("separator", "\n"), ("separator", ";")]);
        assert_eq!(eval("separator+:\n", &parent, 0), Some(2));
        assert_eq!(eval("separator+;\n", &parent, 0), None);
    }

    #[test]
    fn test_run_on_root_cursor_reports_missing_parent() {
        let root = Node::new("separator", ";");
        let atom = Atom::parse("separator+").unwrap();
        assert_eq!(
            atom.evaluate(NodeRef::root(&root)).unwrap_err(),
            TreeError::NoParent
        );
    }
}
