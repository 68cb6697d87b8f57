//! Homeserver module that creates a configured set of push rules for every
//! newly registered account.
//!
//! The module configuration is validated once at load time into a
//! [`RuleSet`]. [`PushRulesPatcher`] then registers an `on_user_registration`
//! callback with the homeserver's [`ModuleApi`] and, for each new account,
//! creates every rule in the `global` scope, one rule at a time.
//!
//! ```ignore
//! let rules = parse_config(&module_config)?;
//! let patcher = PushRulesPatcher::load(rules, api);
//! ```

pub mod config;
pub mod error;
pub mod module_api;
pub mod patcher;
pub mod rule;

pub use config::{RuleSet, parse_config};
pub use error::ConfigError;
pub use module_api::{
    AccountValidityCallbacks, GLOBAL_SCOPE, ModuleApi, NewPushRule, OnUserRegistration,
};
pub use patcher::PushRulesPatcher;
pub use rule::{PushAction, PushCondition, PushRule};
