use thiserror::Error;

/// Errors raised while loading the module configuration.
///
/// Any of these aborts module initialization; a partially built rule set is
/// never handed to the registration hook.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing 'rules' in module configuration")]
    MissingRules,

    #[error("'rules' must be a dictionary")]
    RulesNotAMapping,

    #[error("Push rule '{rule_id}' must be a dictionary")]
    InvalidRule { rule_id: String },

    #[error("Push rule '{rule_id}' is missing required field '{field}'")]
    MissingField { rule_id: String, field: &'static str },

    #[error("Push rule '{rule_id}' has an invalid '{field}': expected {expected}")]
    InvalidField { rule_id: String, field: &'static str, expected: &'static str },

    #[error("Push rule '{rule_id}' has unknown field '{field}'")]
    UnknownField { rule_id: String, field: String },

    #[error("Invalid YAML in module configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON in module configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// The rule the error refers to, if it is specific to one rule.
    pub fn rule_id(&self) -> Option<&str> {
        match self {
            ConfigError::InvalidRule { rule_id }
            | ConfigError::MissingField { rule_id, .. }
            | ConfigError::InvalidField { rule_id, .. }
            | ConfigError::UnknownField { rule_id, .. } => Some(rule_id),
            _ => None,
        }
    }
}
