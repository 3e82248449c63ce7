use anyhow::Context;
use clap::Parser;
use portal_server::config::read_config;
use portal_server::{AppState, router};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "portal-server", version, about = "Research report server with audit trail")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "PORTAL_CONFIG", default_value = "portal.toml")]
    config: PathBuf,

    /// Bind address, e.g. 127.0.0.1:8080 (overrides server.bind)
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = read_config(&cli.config)?;
    let from_file = loaded.is_some();
    let mut config = loaded.unwrap_or_default();
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }

    // RUST_LOG wins over the configured directive.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if from_file {
        tracing::info!(path = %cli.config.display(), "Loaded configuration");
    } else {
        tracing::info!(
            path = %cli.config.display(),
            "Configuration file not found, using defaults"
        );
    }

    let state = AppState::from_config(&config.audit).context("failed to set up audit trail")?;
    tracing::info!(
        enabled = config.audit.enabled,
        backend = ?config.audit.storage.backend,
        "Audit trail ready"
    );

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    tracing::info!("portal-server listening on {}", config.server.bind);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
