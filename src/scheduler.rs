use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::deploy::CRONJOB_CAUSE;
use crate::execution_context::ExecutionContext;

/// One scheduled tick: a single redeploy tagged `cronjob`.
///
/// Returns once the deploy and its notification are done.
#[tracing::instrument(skip_all, fields(invocation_id = %Uuid::new_v4()))]
pub async fn scheduled(state: &Arc<AppState>) {
    tracing::info!("Scheduled redeploy");

    let ctx = ExecutionContext::new();
    state.schedule_deploy(&ctx, CRONJOB_CAUSE);
    ctx.finish().await;
}

/// Runs [`scheduled`] every `interval` until `shutdown` flips to `true`.
///
/// The first tick fires one full interval after start, not immediately.
pub async fn schedule_loop(
    state: Arc<AppState>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = redeploy_ticker(interval);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => break,
        }

        if *shutdown.borrow() {
            break;
        }

        scheduled(&state).await;
    }

    tracing::debug!("Schedule loop stopped");
}

/// A tick that overran is not made up for; the next one waits a full interval.
fn redeploy_ticker(interval: Duration) -> tokio::time::Interval {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}
