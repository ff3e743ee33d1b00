//! fliesdemo - spider-and-flies for a remote presentation service.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use fliesdemo::{Session, SessionConfig};
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    initialize_tracing();

    let cli = Cli::parse();
    let config = SessionConfig::load_or_default(Some(cli.config.as_path()))?;

    match cli.command {
        Command::Connect { host, port } => run_connect(config.with_endpoint(host, port)).await,
        Command::Listen { host, port } => run_listen(config.with_endpoint(host, port)).await,
    }
}

/// Dial the presentation service and play until it hangs up.
#[instrument(skip(config), fields(address = %config.address()))]
async fn run_connect(config: SessionConfig) -> Result<()> {
    info!("Connecting to presentation service");
    let stream = TcpStream::connect(config.address()).await?;

    let report = Session::over(stream, config).run().await?;
    info!(
        rounds = report.rounds_completed(),
        moves = report.moves_applied(),
        rejected = report.moves_rejected(),
        "Presentation service dropped connection"
    );
    Ok(())
}

/// Accept connections and run one session per connection, in turn.
#[instrument(skip(config), fields(address = %config.address()))]
async fn run_listen(config: SessionConfig) -> Result<()> {
    let listener = TcpListener::bind(config.address()).await?;
    info!("📡 Waiting for presentation service connections");

    loop {
        let (stream, peer) = listener.accept().await?;
        info!(%peer, "Connection accepted");

        match Session::over(stream, config.clone()).run().await {
            Ok(report) => info!(%peer, ?report, "Session ended"),
            Err(e) => error!(%peer, error = %e, "Session aborted"),
        }
    }
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,fliesdemo=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
