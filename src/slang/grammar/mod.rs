//! Grammar - the ordered rule table driving the rewriter
//!
//!     A grammar is an ordered list of rules. At every cursor position the rewriter tries
//!     the rules in declaration order and folds the run matched by the first one that
//!     succeeds, so order is priority: put the more specific production first.
//!
//!     Grammars are plain values. They are built once (in code, from YAML/JSON, or the
//!     builtin slang grammar) and only read while parsing, so one grammar can back any
//!     number of parses.
//!
//!     See [atom](atom) for the rule notation and [config](config) for the file format.

pub mod atom;
pub mod config;
pub mod rule;

pub use atom::{Atom, AtomError, Quantifier};
pub use config::{GrammarConfig, RuleConfig};
pub use rule::{Pattern, Rule, RuleMatch};

use once_cell::sync::Lazy;
use std::fs;
use std::path::Path;

/// Source of the builtin slang grammar.
const BUILTIN_YAML: &str = include_str!("builtin.yaml");

static BUILTIN: Lazy<Grammar> =
    Lazy::new(|| Grammar::from_yaml(BUILTIN_YAML).expect("builtin grammar is valid"));

/// Errors raised while building or querying a grammar.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("rule `{0}` not found")]
    RuleNotFound(String),

    #[error("rule `{0}` matches nothing")]
    EmptyRule(String),

    #[error("rule `{0}` defines both `atoms` and `regex`")]
    AmbiguousPattern(String),

    #[error("invalid atom in rule `{rule}`: {source}")]
    InvalidAtom { rule: String, source: AtomError },

    #[error("invalid regex in rule `{rule}`: {source}")]
    InvalidRegex { rule: String, source: regex::Error },

    #[error("unsupported grammar file `{0}`, expected .yaml, .yml or .json")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// An ordered, immutable table of rules.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    rules: Vec<Rule>,
}

impl Grammar {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The slang grammar: arithmetic, assignment, nop and parenthesised expression.
    pub fn builtin() -> &'static Grammar {
        &BUILTIN
    }

    pub fn from_config(config: GrammarConfig) -> Result<Self, GrammarError> {
        let rules = config
            .rules
            .into_iter()
            .map(Rule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(rules = rules.len(), "grammar loaded");
        Ok(Self { rules })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, GrammarError> {
        Self::from_config(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        Self::from_config(serde_json::from_str(json)?)
    }

    /// Load a grammar file, picking the format from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err(GrammarError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// First rule named `name`.
    pub fn rule(&self, name: &str) -> Result<&Rule, GrammarError> {
        self.rules
            .iter()
            .find(|rule| rule.name() == name)
            .ok_or_else(|| GrammarError::RuleNotFound(name.to_string()))
    }

    /// Highest `min_layer` of any rule: the driver runs at least this many passes.
    pub fn max_layer(&self) -> usize {
        self.rules.iter().map(Rule::min_layer).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
