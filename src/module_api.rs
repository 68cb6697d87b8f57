use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::rule::{PushAction, PushCondition};

/// Scope every rule is created under.
pub const GLOBAL_SCOPE: &str = "global";

/// Callback invoked with the user ID of every newly registered account.
pub type OnUserRegistration<E> =
    Arc<dyn Fn(String) -> BoxFuture<'static, Result<(), E>> + Send + Sync>;

/// Account validity callbacks a module can register with the homeserver.
pub struct AccountValidityCallbacks<E> {
    pub on_user_registration: Option<OnUserRegistration<E>>,
}

impl<E> Default for AccountValidityCallbacks<E> {
    fn default() -> Self {
        Self { on_user_registration: None }
    }
}

impl<E> fmt::Debug for AccountValidityCallbacks<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountValidityCallbacks")
            .field("on_user_registration", &self.on_user_registration.is_some())
            .finish()
    }
}

/// Arguments of a single push rule creation on behalf of a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPushRule {
    pub user_id: String,
    pub scope: String,
    pub kind: String,
    pub rule_id: String,
    pub conditions: Vec<PushCondition>,
    pub actions: Vec<PushAction>,
}

/// The part of the homeserver's module API this module relies on.
///
/// The homeserver provides the implementation; tests substitute their own.
#[async_trait]
pub trait ModuleApi: Send + Sync + 'static {
    /// Error reported by the homeserver. Never inspected by this module.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Whether this process is a worker rather than the main process.
    fn worker_app(&self) -> bool;

    /// Create (or replace) a push rule for a local user.
    async fn add_push_rule_for_user(&self, rule: NewPushRule) -> Result<(), Self::Error>;

    /// Register callbacks on the account validity lifecycle.
    fn register_account_validity_callbacks(&self, callbacks: AccountValidityCallbacks<Self::Error>);
}
