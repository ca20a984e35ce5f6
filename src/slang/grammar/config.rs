//! Grammar configuration
//!
//! The serializable form of a grammar, as read from YAML or JSON:
//!
//! ```yaml
//! rules:
//!   - name: nop
//!     atoms: ["separator+"]
//!   - name: keyword
//!     regex: "let|var"
//!     min_layer: 1
//! ```
//!
//! Each rule defines exactly one of `atoms` or `regex`.

use super::{GrammarError, Rule};
use serde::{Deserialize, Serialize};

/// YAML/JSON-deserializable grammar definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarConfig {
    /// Rules in priority order
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// One rule of a [`GrammarConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Type of the composite node this rule produces
    pub name: String,

    /// Atom notation, one entry per position
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub atoms: Vec<String>,

    /// Regular expression over the value of a single node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,

    /// Number of completed passes before the rule applies
    #[serde(default)]
    pub min_layer: usize,
}

impl TryFrom<RuleConfig> for Rule {
    type Error = GrammarError;

    fn try_from(config: RuleConfig) -> Result<Self, Self::Error> {
        let rule = match (config.atoms.is_empty(), config.regex) {
            (false, Some(_)) => return Err(GrammarError::AmbiguousPattern(config.name)),
            (true, None) => return Err(GrammarError::EmptyRule(config.name)),
            (true, Some(regex)) => Rule::regex(config.name, &regex)?,
            (false, None) => Rule::new(config.name, &config.atoms)?,
        };
        Ok(rule.with_min_layer(config.min_layer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slang::grammar::rule::Pattern;

    fn rule_config(atoms: &[&str], regex: Option<&str>) -> RuleConfig {
        RuleConfig {
            name: "r".into(),
            atoms: atoms.iter().map(|s| s.to_string()).collect(),
            regex: regex.map(str::to_string),
            min_layer: 3,
        }
    }

    #[test]
    fn test_atoms_rule_keeps_min_layer() {
        let rule = Rule::try_from(rule_config(&["separator+"], None)).unwrap();
        assert_eq!(rule.name(), "r");
        assert_eq!(rule.min_layer(), 3);
        assert!(matches!(rule.pattern(), Pattern::Atoms(atoms) if atoms.len() == 1));
    }

    #[test]
    fn test_regex_rule() {
        let rule = Rule::try_from(rule_config(&[], Some("[0-9]+"))).unwrap();
        assert!(matches!(rule.pattern(), Pattern::Regex(_)));
    }

    #[test]
    fn test_rule_needs_exactly_one_pattern() {
        assert!(matches!(
            Rule::try_from(rule_config(&["a"], Some("b"))),
            Err(GrammarError::AmbiguousPattern(_))
        ));
        assert!(matches!(
            Rule::try_from(rule_config(&[], None)),
            Err(GrammarError::EmptyRule(_))
        ));
    }

    #[test]
    fn test_yaml_shape() {
        let yaml = "rules:\n  - name: keyword\n    regex: let|var\n    min_layer: 1\n";
        let config: GrammarConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].regex.as_deref(), Some("let|var"));
        assert!(config.rules[0].atoms.is_empty());
        assert_eq!(config.rules[0].min_layer, 1);
    }
}
