use async_trait::async_trait;
use matryx_push_rules::{AccountValidityCallbacks, ModuleApi, NewPushRule, OnUserRegistration};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
#[error("failed to create push rule {rule_id}")]
pub struct RuleStoreError {
    pub rule_id: String,
}

/// In-memory stand-in for the homeserver module API that records every push
/// rule creation it receives.
#[derive(Default)]
pub struct RecordingModuleApi {
    pub worker: bool,
    pub fail_on_rule: Option<String>,
    pub delay: Option<Duration>,
    created: Mutex<Vec<NewPushRule>>,
    on_user_registration: Mutex<Vec<OnUserRegistration<RuleStoreError>>>,
}

impl RecordingModuleApi {
    pub fn main_process() -> Self {
        Self::default()
    }

    pub fn worker() -> Self {
        Self { worker: true, ..Self::default() }
    }

    pub fn failing_on(rule_id: &str) -> Self {
        Self { fail_on_rule: Some(rule_id.to_string()), ..Self::default() }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay: Some(delay), ..Self::default() }
    }

    pub fn created(&self) -> Vec<NewPushRule> {
        self.created.lock().unwrap().clone()
    }

    pub fn created_for(&self, user_id: &str) -> Vec<NewPushRule> {
        self.created().into_iter().filter(|rule| rule.user_id == user_id).collect()
    }

    pub fn registered_callbacks(&self) -> usize {
        self.on_user_registration.lock().unwrap().len()
    }

    /// Fire the registration callbacks the way the homeserver does after an
    /// account is created.
    pub async fn register_user(&self, user_id: &str) -> Result<(), RuleStoreError> {
        let callbacks = self.on_user_registration.lock().unwrap().clone();
        for callback in callbacks {
            callback(user_id.to_string()).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ModuleApi for RecordingModuleApi {
    type Error = RuleStoreError;

    fn worker_app(&self) -> bool {
        self.worker
    }

    async fn add_push_rule_for_user(&self, rule: NewPushRule) -> Result<(), RuleStoreError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on_rule.as_deref() == Some(rule.rule_id.as_str()) {
            return Err(RuleStoreError { rule_id: rule.rule_id });
        }
        self.created.lock().unwrap().push(rule);
        Ok(())
    }

    fn register_account_validity_callbacks(&self, callbacks: AccountValidityCallbacks<RuleStoreError>) {
        if let Some(callback) = callbacks.on_user_registration {
            self.on_user_registration.lock().unwrap().push(callback);
        }
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
