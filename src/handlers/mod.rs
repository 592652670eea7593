mod fallback_handler;
mod github_webhook_handler;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::{Extension, Router};

use crate::app_state::AppState;
use crate::execution_context::ExecutionContext;

use fallback_handler::{method_not_allowed_handler, not_found_handler};
use github_webhook_handler::github_webhook_handler;

pub const GITHUB_WEBHOOK_PATH: &str = "/github";

/// GitHub caps webhook payloads at 25 MB.
pub const GITHUB_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Deployments accepted by any request are registered on `ctx`.
pub fn router(state: Arc<AppState>, ctx: ExecutionContext) -> Router {
    Router::new()
        .route(
            GITHUB_WEBHOOK_PATH,
            post(github_webhook_handler)
                .fallback(method_not_allowed_handler)
                .layer(DefaultBodyLimit::max(GITHUB_MAX_BODY_BYTES)),
        )
        .fallback(not_found_handler)
        .layer(Extension(state))
        .layer(Extension(ctx))
}
