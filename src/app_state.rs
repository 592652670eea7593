use std::sync::Arc;

use tracing::Instrument;

use crate::config::Config;
use crate::deploy::Deployer;
use crate::execution_context::ExecutionContext;
use crate::notifier::Notifier;

/// Everything an invocation needs; shared read-only between invocations.
pub struct AppState {
    webhook_secret: Option<String>,
    deployer: Deployer,
    notifier: Notifier,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::new();

        if config.webhook_secret.is_none() {
            tracing::warn!("WEBHOOK_SECRET is not set, every webhook delivery will be rejected");
        }

        let notifier = Notifier::new(client.clone(), config.notify_url());
        if !notifier.is_enabled() {
            tracing::info!("Discord webhook is not configured, notifications go to the log only");
        }

        Self {
            webhook_secret: config.webhook_secret.clone(),
            deployer: Deployer::new(client, config),
            notifier,
        }
    }

    pub fn webhook_secret(&self) -> Option<&str> {
        self.webhook_secret.as_deref()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Hands a deployment off to `ctx`; returns before it starts.
    pub fn schedule_deploy(self: &Arc<Self>, ctx: &ExecutionContext, cause: &str) {
        let state = self.clone();
        let task_ctx = ctx.clone();
        let cause = cause.to_string();

        ctx.wait_until(
            async move {
                state
                    .deployer
                    .deploy(&state.notifier, &task_ctx, &cause)
                    .await;
            }
            .in_current_span(),
        );
    }
}
