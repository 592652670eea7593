use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::deploy::RELEASE_CAUSE;
use crate::error::RedeployError;
use crate::events::LogMessage;
use crate::execution_context::ExecutionContext;
use crate::signature::{verify_signature, Signature, SIGNATURE_HEADER};
use crate::webhook_payloads::github::GithubReleaseWebhookPayload;

const EVENT_HEADER: &str = "x-github-event";
const RELEASE_EVENT: &str = "release";

pub async fn github_webhook_handler(
    Extension(state): Extension<Arc<AppState>>,
    Extension(ctx): Extension<ExecutionContext>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle_delivery(&state, &ctx, &headers, body).await
}

#[tracing::instrument(skip_all, fields(invocation_id = %Uuid::new_v4()))]
async fn handle_delivery(
    state: &Arc<AppState>,
    ctx: &ExecutionContext,
    headers: &HeaderMap,
    body: Bytes,
) -> Response {
    tracing::info!("Received webhook");

    let signature = verify_signature(
        body,
        headers.get(SIGNATURE_HEADER).map(HeaderValue::as_bytes),
        state.webhook_secret(),
    );

    let body = match signature {
        Signature::Valid(body) => body,
        rejected => {
            state.notifier().notify(
                ctx,
                LogMessage::new(rejected.log_message()).with("headers", headers_to_json(headers)),
            );

            return (rejected.status(), rejected.response_text()).into_response();
        }
    };

    let event = headers.get(EVENT_HEADER).map(|v| String::from_utf8_lossy(v.as_bytes()));
    if event.as_deref() != Some(RELEASE_EVENT) {
        state.notifier().notify(
            ctx,
            LogMessage::new("Received unexpected GitHub event")
                .with("event", event.map(|e| e.into_owned())),
        );

        return ok();
    }

    let payload = match GithubReleaseWebhookPayload::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            let e = RedeployError::from(e);
            state.notifier().notify(
                ctx,
                LogMessage::new("Received release event with a malformed payload")
                    .with("error", e.to_string()),
            );

            return (StatusCode::BAD_REQUEST, "INVALID_PAYLOAD").into_response();
        }
    };

    // other actions (created, edited, released, ...) are routine, stay quiet
    if !payload.is_published() {
        tracing::debug!(action = ?payload.action, "Ignoring release action");
        return ok();
    }

    if let Some(release) = &payload.release {
        tracing::info!(
            tag = ?release.tag_name,
            name = ?release.name,
            url = ?release.html_url,
            "Release published"
        );
    }
    state.schedule_deploy(ctx, RELEASE_CAUSE);

    ok()
}

fn ok() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// Lower-case header names; repeated headers are joined with `, `.
fn headers_to_json(headers: &HeaderMap) -> Value {
    let mut map = Map::new();

    for name in headers.keys() {
        let value = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");

        map.insert(name.as_str().to_string(), Value::String(value));
    }

    Value::Object(map)
}
