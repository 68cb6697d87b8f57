use futures::future::BoxFuture;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, instrument, warn};

use crate::config::RuleSet;
use crate::module_api::{
    AccountValidityCallbacks, GLOBAL_SCOPE, ModuleApi, NewPushRule, OnUserRegistration,
};

/// Creates the configured push rules for every newly registered account.
pub struct PushRulesPatcher<A: ModuleApi> {
    api: Arc<A>,
    rules: Arc<RuleSet>,
    attached: AtomicBool,
}

impl<A: ModuleApi> PushRulesPatcher<A> {
    /// Create a patcher without registering it with the homeserver.
    pub fn new(rules: Arc<RuleSet>, api: Arc<A>) -> Self {
        Self { api, rules, attached: AtomicBool::new(false) }
    }

    /// Create a patcher and register its `on_user_registration` callback.
    pub fn load(rules: RuleSet, api: Arc<A>) -> Arc<Self> {
        let patcher = Arc::new(Self::new(Arc::new(rules), api));
        patcher.attach();
        patcher
    }

    /// Register [`Self::apply_rules_for_user`] as the homeserver's
    /// `on_user_registration` callback.
    ///
    /// Only the first call registers anything; later calls log a warning and
    /// return without registering a second callback.
    ///
    /// The callback holds a strong reference to the patcher, which holds the
    /// module API that stores the callback. Neither is ever freed, so the
    /// patcher lives as long as the process.
    pub fn attach(self: &Arc<Self>) {
        if self.attached.swap(true, Ordering::AcqRel) {
            warn!("on_user_registration callback already registered, ignoring attach");
            return;
        }

        let patcher = Arc::clone(self);
        let on_user_registration: OnUserRegistration<A::Error> =
            Arc::new(move |user_id: String| -> BoxFuture<'static, Result<(), A::Error>> {
                let patcher = Arc::clone(&patcher);
                Box::pin(async move { patcher.apply_rules_for_user(&user_id).await })
            });

        self.api.register_account_validity_callbacks(AccountValidityCallbacks {
            on_user_registration: Some(on_user_registration),
        });
        debug!("Registered on_user_registration callback for {} push rule(s)", self.rules.len());
    }

    /// Create every configured push rule for `user_id`, one at a time and in
    /// configuration order.
    ///
    /// The first homeserver error aborts the remaining rules and is returned
    /// as is. Rules created before the failure are left in place.
    #[instrument(skip(self), level = "debug")]
    pub async fn apply_rules_for_user(&self, user_id: &str) -> Result<(), A::Error> {
        // Registration callbacks only fire on the main process; bail out in
        // case that ever changes.
        if self.api.worker_app() {
            warn!("Attempted to run callback 'apply_rules_for_user' on a worker, aborting");
            return Ok(());
        }

        for (rule_id, rule) in self.rules.iter() {
            debug!("Creating {} push rule {} for {}", rule.kind(), rule_id, user_id);
            self.api
                .add_push_rule_for_user(NewPushRule {
                    user_id: user_id.to_string(),
                    scope: GLOBAL_SCOPE.to_string(),
                    kind: rule.kind().to_string(),
                    rule_id: rule_id.to_string(),
                    conditions: rule.conditions().to_vec(),
                    actions: rule.actions().to_vec(),
                })
                .await?;
        }

        info!("Created {} push rule(s) for {}", self.rules.len(), user_id);
        Ok(())
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}
