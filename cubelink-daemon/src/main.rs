//! Cubelink
//!
//! Bridges a CI server's build list to a game-server plugin and relays
//! local commands.
//!
//! Architecture:
//! - Configuration: Load settings from environment or defaults
//! - Services: Build source, notifier, command executor, task dispatcher
//! - Scheduler: Build polling and new-build detection
//! - API: Local request server acknowledging and queueing work
//! - Trigger: One-shot GET against a running daemon
//!
//! Without arguments the binary runs as the daemon. With exactly one
//! argument it sends `GET /<arg>` to the local daemon and exits.

mod api;
mod config;
mod context;
mod error;
mod scheduler;
mod service;
mod trigger;

use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::context::Context;
use crate::scheduler::BuildPoller;
use crate::service::{TaskDispatcher, TaskRunner};

#[derive(Parser)]
#[command(name = "cubelink")]
#[command(about = "CI build relay and command bridge for the game server", long_about = None)]
struct Cli {
    /// Daemon address, used for listening and for triggers
    #[arg(long, env = "BIND_ADDR")]
    addr: Option<String>,

    /// Path to request from a running daemon (e.g. `builds`); omit to run the daemon
    #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cubelink=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.args.as_slice() {
        [] => run_daemon(cli.addr).await,
        [path] => {
            let addr = cli.addr.unwrap_or_else(|| Config::default().bind_addr);
            trigger::run_trigger(&addr, path).await;
            Ok(())
        }
        args => {
            warn!("Expected at most one argument, got {}; nothing to do", args.len());
            Ok(())
        }
    }
}

/// Runs the poller, the task dispatcher and the request server until Ctrl-C
async fn run_daemon(addr: Option<String>) -> Result<()> {
    info!("Starting Cubelink daemon");

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(addr) = addr {
        config.bind_addr = addr;
    }
    config.validate().context("Invalid configuration")?;
    info!(
        "Watching {}/{} on {} every {:?}",
        config.repo_owner, config.repo_name, config.ci_url, config.poll_interval
    );

    let context = Context::from_config(config);

    let (dispatcher, tasks) = TaskDispatcher::new(
        TaskRunner::new(&context),
        context.config.max_parallel_tasks,
        context.config.task_queue_capacity,
    );
    dispatcher.spawn();

    let poller = BuildPoller::new(&context);
    tokio::spawn(poller.run());

    let app = api::create_router(tasks);

    let listener = tokio::net::TcpListener::bind(&context.config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", context.config.bind_addr))?;

    info!("Listening on {}", context.config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Request server failed")?;

    info!("Cubelink daemon stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
