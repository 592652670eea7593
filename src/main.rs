mod app_state;
mod config;
mod deploy;
mod error;
mod events;
mod execution_context;
mod handlers;
mod notifier;
mod scheduler;
mod signature;
#[cfg(test)]
mod test_support;
mod webhook_payloads;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use app_state::AppState;
use clap::{Parser, Subcommand};
use config::{Config, ServeOptions};
use error::Result;
use execution_context::ExecutionContext;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Redeploys a Cloudflare Pages project when a GitHub release is published
/// or on a schedule.
#[derive(Parser, Debug)]
#[command(name = "redeploy", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Listen for GitHub release webhooks
    Serve(ServeOptions),
    /// Redeploy once, for use from an external timer
    Scheduled,
}

async fn serve(state: Arc<AppState>, options: ServeOptions) -> Result<()> {
    let shutdown = shutdown_signal()?;
    let ctx = ExecutionContext::new();
    let app = handlers::router(state.clone(), ctx.clone());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let schedule = options.schedule_interval.map(|secs| {
        tracing::info!("Redeploying every {secs}s");
        tokio::spawn(scheduler::schedule_loop(
            state.clone(),
            Duration::from_secs(secs),
            shutdown_rx,
        ))
    });

    let listener = TcpListener::bind(options.bind).await?;
    tracing::info!("Listening on {}", options.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    let _ = shutdown_tx.send(true);
    if let Some(schedule) = schedule {
        schedule.await?;
    }

    tracing::info!(pending = ctx.pending(), "Waiting for background work");
    ctx.finish().await;

    Ok(())
}

/// Resolves on SIGTERM or SIGINT. Handlers are installed before this returns,
/// so a signal arriving while the server starts is not lost.
#[cfg(unix)]
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut interrupt = signal(SignalKind::interrupt())?;

    Ok(async move {
        tokio::select! {
            _ = terminate.recv() => tracing::info!("Received SIGTERM, shutting down"),
            _ = interrupt.recv() => tracing::info!("Received SIGINT, shutting down"),
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> std::io::Result<impl Future<Output = ()>> {
    Ok(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Can't listen for shutdown signal: {e}");
            std::future::pending::<()>().await;
        }

        tracing::info!("Shutting down");
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("redeploy=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let state = Arc::new(AppState::new(&cli.config));

    match cli.command {
        Commands::Serve(options) => serve(state, options).await,
        Commands::Scheduled => {
            scheduler::scheduled(&state).await;
            Ok(())
        }
    }
}
