//! CadPilot panel server binary.

use anyhow::Context;
use cadpilot_core::assistant::{ChatSession, DocsRetriever, SubprocessRunner};
use cadpilot_core::infrastructure::ai::AnthropicClient;
use cadpilot_core::infrastructure::storage::SnapshotStore;
use cadpilot_core::service::config::Config;
use cadpilot_panel_server::{build_router, AppState};
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "cadpilot-panel-server",
    about = "HTTP bridge for the CadPilot chat panel"
)]
struct Args {
    /// Listen port
    #[arg(long, default_value_t = 8787)]
    port: u16,

    /// Settings file (defaults to the per-user config directory)
    #[arg(long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    // A missing API key fails here, before anything is served.
    let config =
        Config::load_from(args.config.as_deref()).context("failed to load configuration")?;

    let gateway = AnthropicClient::from_config(&config);
    let runner = SubprocessRunner::from_settings(&config.settings);
    let store = SnapshotStore::new(config.cache_file(), config.settings.cache_expiry_days);
    let docs = DocsRetriever::load_or_rebuild(&store);
    let session = ChatSession::new(
        Box::new(gateway),
        Box::new(runner),
        docs,
        &config.settings,
    );

    let router = build_router(AppState::new(session));
    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("CadPilot panel server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .context("server error")?;
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_env("CADPILOT_LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
