//! Guildkeeper service entry point.
//!
//! Binary name: `gkeeper`
//!
//! Parses CLI arguments, loads configuration, initializes storage and the
//! background tasks (session sweeper, sync scheduler), then serves the
//! presentation-facing HTTP API until shutdown.

mod config;
mod http;
mod state;

use std::path::PathBuf;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "gkeeper", about = "Guild roster registration service")]
struct Cli {
    /// Path to guildkeeper.toml (defaults to ~/.guildkeeper/guildkeeper.toml)
    #[arg(long, env = "GUILDKEEPER_CONFIG")]
    config: Option<PathBuf>,

    /// Override the HTTP bind address
    #[arg(long, env = "GUILDKEEPER_BIND_ADDR")]
    bind: Option<String>,

    /// Override the database url
    #[arg(long, env = "GUILDKEEPER_DATABASE_URL")]
    database_url: Option<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,guildkeeper=debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let mut app_config = config::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        app_config.bind_addr = bind;
    }
    if let Some(database_url) = cli.database_url {
        app_config.database_url = Some(database_url);
    }

    let shutdown = CancellationToken::new();
    let state = AppState::init(app_config.clone(), shutdown.clone()).await?;

    let listener = tokio::net::TcpListener::bind(&app_config.bind_addr).await?;
    tracing::info!(addr = %app_config.bind_addr, "guildkeeper listening");

    let router = http::router::build_router(state);
    let server_shutdown = shutdown.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = server_shutdown.cancelled() => {}
            }
        })
        .await?;

    // Stop the sweeper and scheduler tasks
    shutdown.cancel();
    tracing::info!("guildkeeper stopped");
    Ok(())
}
