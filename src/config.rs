//! Loading the module configuration into a [`RuleSet`].
//!
//! The homeserver hands the module its configuration block as an untyped
//! mapping, e.g.
//!
//! ```yaml
//! rules:
//!   .m.rule.contains_user_name:
//!     kind: content
//!     actions: ["dont_notify"]
//! ```

use serde_json::Value;
use tracing::debug;

use crate::error::ConfigError;
use crate::rule::PushRule;

const RULES_KEY: &str = "rules";

/// The validated set of push rules to create for each new account, keyed by
/// rule ID and kept in configuration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: Vec<(String, PushRule)>,
}

impl RuleSet {
    /// Validate a configuration document and build the rule set from its
    /// `rules` mapping.
    ///
    /// Fails on the first malformed rule; no partial rule set is returned.
    pub fn from_config(config: &Value) -> Result<Self, ConfigError> {
        let rules = config.get(RULES_KEY).ok_or(ConfigError::MissingRules)?;
        let rules = rules.as_object().ok_or(ConfigError::RulesNotAMapping)?;

        let mut rule_set = Self::default();
        for (rule_id, definition) in rules {
            let rule = PushRule::from_definition(rule_id, definition)?;
            rule_set.insert(rule_id.clone(), rule);
        }

        debug!("Loaded {} push rule(s) from module configuration", rule_set.len());
        Ok(rule_set)
    }

    /// Parse a YAML module configuration block.
    pub fn from_yaml_str(config: &str) -> Result<Self, ConfigError> {
        let document: Value = serde_yaml::from_str(config)?;
        Self::from_config(&document)
    }

    /// Parse a JSON module configuration block.
    pub fn from_json_str(config: &str) -> Result<Self, ConfigError> {
        let document: Value = serde_json::from_str(config)?;
        Self::from_config(&document)
    }

    /// Insert a rule, replacing an existing rule with the same ID in place.
    fn insert(&mut self, rule_id: String, rule: PushRule) {
        match self.rules.iter_mut().find(|(id, _)| *id == rule_id) {
            Some((_, existing)) => *existing = rule,
            None => self.rules.push((rule_id, rule)),
        }
    }

    pub fn get(&self, rule_id: &str) -> Option<&PushRule> {
        self.rules.iter().find(|(id, _)| id == rule_id).map(|(_, rule)| rule)
    }

    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(id, _)| id.as_str())
    }

    /// Rules in the order they are applied.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PushRule)> {
        self.rules.iter().map(|(id, rule)| (id.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Validate the module configuration block handed over by the homeserver.
pub fn parse_config(config: &Value) -> Result<RuleSet, ConfigError> {
    RuleSet::from_config(config)
}
