use reqwest::header::CONTENT_TYPE;

use crate::config::Config;
use crate::error::RedeployError;
use crate::events::LogMessage;
use crate::execution_context::ExecutionContext;
use crate::notifier::{Notifier, JSON_CONTENT_TYPE};

pub const CRONJOB_CAUSE: &str = "cronjob";
pub const RELEASE_CAUSE: &str = "GitHub webhook for a release event";

/// Starts new Cloudflare Pages deployments for one project.
#[derive(Clone)]
pub struct Deployer {
    client: reqwest::Client,
    url: String,
    email: String,
    auth_key: String,
}

impl Deployer {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            url: config.deployments_url(),
            email: config.email.clone(),
            auth_key: config.auth_key.clone(),
        }
    }

    /// Triggers one deployment and reports the outcome. Never retries.
    pub async fn deploy(&self, notifier: &Notifier, ctx: &ExecutionContext, cause: &str) {
        tracing::info!(cause, "Starting new deployment");

        let message = match self.trigger().await {
            Ok(()) => LogMessage::new("Successfully redeployed").with("cause", cause),
            Err(RedeployError::DeployRejected(text)) => {
                LogMessage::new("Failed to start new deployment").with("cause", text)
            }
            Err(e) => LogMessage::new("Failed to start new deployment").with("cause", e.to_string()),
        };

        notifier.notify(ctx, message);
    }

    async fn trigger(&self) -> Result<(), RedeployError> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header("X-Auth-Email", &self.email)
            .header("X-Auth-Key", &self.auth_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            tracing::warn!(%status, "Deployment endpoint rejected the request");

            return Err(RedeployError::DeployRejected(text));
        }

        Ok(())
    }
}
