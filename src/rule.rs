use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::ConfigError;

/// A push rule condition. Its keys (`kind`, `key`, `pattern`, `is`, ...) are
/// interpreted by the homeserver, not by this module.
pub type PushCondition = Map<String, Value>;

/// Push action for Matrix push rules
/// Represents the union type object|string of the `actions` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PushAction {
    /// String action (like "notify", "dont_notify", "coalesce")
    String(String),
    /// Object action, e.g. `{"set_tweak": "sound", "value": "default"}`
    Object(BTreeMap<String, String>),
}

impl PushAction {
    pub fn notify() -> Self {
        PushAction::String("notify".to_string())
    }

    pub fn dont_notify() -> Self {
        PushAction::String("dont_notify".to_string())
    }
}

const FIELD_KIND: &str = "kind";
const FIELD_CONDITIONS: &str = "conditions";
const FIELD_ACTIONS: &str = "actions";

/// A push rule to create for every new account, as read from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PushRule {
    kind: String,
    conditions: Vec<PushCondition>,
    actions: Vec<PushAction>,
}

impl PushRule {
    /// Build a rule from its definition in the `rules` mapping.
    ///
    /// `kind` and `actions` are required, `conditions` defaults to an empty
    /// list. Any other field is rejected.
    pub fn from_definition(rule_id: &str, definition: &Value) -> Result<Self, ConfigError> {
        let fields = definition
            .as_object()
            .ok_or_else(|| ConfigError::InvalidRule { rule_id: rule_id.to_string() })?;

        if let Some(unknown) = fields
            .keys()
            .find(|k| !matches!(k.as_str(), FIELD_KIND | FIELD_CONDITIONS | FIELD_ACTIONS))
        {
            return Err(ConfigError::UnknownField {
                rule_id: rule_id.to_string(),
                field: unknown.clone(),
            });
        }

        let kind = match fields.get(FIELD_KIND) {
            Some(Value::String(kind)) => kind.clone(),
            Some(_) => return Err(invalid(rule_id, FIELD_KIND, "a string")),
            None => return Err(missing(rule_id, FIELD_KIND)),
        };

        let conditions = match fields.get(FIELD_CONDITIONS) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_object()
                        .cloned()
                        .ok_or_else(|| invalid(rule_id, FIELD_CONDITIONS, "a list of dictionaries"))
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(invalid(rule_id, FIELD_CONDITIONS, "a list of dictionaries")),
            None => Vec::new(),
        };

        let actions = match fields.get(FIELD_ACTIONS) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| parse_action(rule_id, item))
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(invalid(rule_id, FIELD_ACTIONS, "a list")),
            None => return Err(missing(rule_id, FIELD_ACTIONS)),
        };

        Ok(Self { kind, conditions, actions })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn conditions(&self) -> &[PushCondition] {
        &self.conditions
    }

    pub fn actions(&self) -> &[PushAction] {
        &self.actions
    }
}

fn parse_action(rule_id: &str, item: &Value) -> Result<PushAction, ConfigError> {
    const EXPECTED: &str = "a list of strings or string-to-string dictionaries";

    match item {
        Value::String(action) => Ok(PushAction::String(action.clone())),
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| match value {
                Value::String(value) => Ok((key.clone(), value.clone())),
                _ => Err(invalid(rule_id, FIELD_ACTIONS, EXPECTED)),
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(PushAction::Object),
        _ => Err(invalid(rule_id, FIELD_ACTIONS, EXPECTED)),
    }
}

fn missing(rule_id: &str, field: &'static str) -> ConfigError {
    ConfigError::MissingField { rule_id: rule_id.to_string(), field }
}

fn invalid(rule_id: &str, field: &'static str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidField { rule_id: rule_id.to_string(), field, expected }
}
