use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};
use tracing::Instrument;

use crate::error::RedeployError;
use crate::events::LogMessage;
use crate::execution_context::ExecutionContext;

pub const JSON_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Best-effort operator channel backed by a Discord webhook.
///
/// Every message is logged. When a webhook URL is configured it is also
/// posted in the background; delivery failures are dropped.
#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
    url: Option<String>,
}

impl Notifier {
    pub fn new(client: reqwest::Client, url: Option<String>) -> Self {
        Self { client, url }
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    pub fn notify(&self, ctx: &ExecutionContext, message: LogMessage) {
        let fields = Value::Object(message.fields.clone());
        tracing::info!(fields = %fields, "{}", message.msg);

        let Some(url) = self.url.clone() else {
            return;
        };

        let client = self.client.clone();
        ctx.wait_until(
            async move {
                if let Err(e) = send(&client, &url, &message).await {
                    tracing::debug!("Dropped notification: {e}");
                }
            }
            .in_current_span(),
        );
    }
}

async fn send(
    client: &reqwest::Client,
    url: &str,
    message: &LogMessage,
) -> Result<(), RedeployError> {
    let body = serde_json::to_vec(&json!({ "content": message.to_code_block()? }))?;

    let response = client
        .post(url)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .body(body)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(RedeployError::NotifyRejected(response.status()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::test_support::Recorder;

    #[tokio::test]
    async fn posts_fenced_json_to_discord_webhook() {
        let recorder = Recorder::start(StatusCode::OK, "").await;
        let notifier = Notifier::new(
            reqwest::Client::new(),
            Some(format!("{}/api/webhooks/12345/moresecret", recorder.base_url)),
        );
        let ctx = ExecutionContext::new();

        notifier.notify(&ctx, LogMessage::new("Successfully redeployed").with("cause", "cronjob"));
        ctx.finish().await;

        let requests = recorder.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/api/webhooks/12345/moresecret");
        assert_eq!(requests[0].headers[CONTENT_TYPE], JSON_CONTENT_TYPE);

        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(
            body,
            json!({
                "content": "```json\n{\n  \"msg\": \"Successfully redeployed\",\n  \"cause\": \"cronjob\"\n}```"
            })
        );
    }

    #[tokio::test]
    async fn disabled_notifier_sends_nothing() {
        let recorder = Recorder::start(StatusCode::OK, "").await;
        let notifier = Notifier::new(reqwest::Client::new(), None);
        let ctx = ExecutionContext::new();

        notifier.notify(&ctx, LogMessage::new("Received unexpected GitHub event"));
        ctx.finish().await;

        assert!(!notifier.is_enabled());
        assert!(recorder.requests().is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_dropped() {
        // nothing listens on port 1
        let notifier = Notifier::new(
            reqwest::Client::new(),
            Some("http://127.0.0.1:1/api/webhooks/12345/moresecret".to_string()),
        );
        let ctx = ExecutionContext::new();

        notifier.notify(&ctx, LogMessage::new("Failed to start new deployment"));
        ctx.finish().await;

        assert_eq!(ctx.pending(), 0);
    }
}
