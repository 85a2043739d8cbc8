use anyhow::Context;
use clap::Parser;
use searchlight_server::{AppState, CliArgs, ServerConfig, serve};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = ServerConfig::load(&args)?;

    // Keep the guard alive so buffered file output is flushed on exit
    let _guard = config.logging.subscriber().init()?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting searchlight");

    let address = config.bind_address();
    let state = AppState::from_config(config).await?;

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Cannot bind {address}"))?;

    serve(listener, state).await?;
    Ok(())
}
