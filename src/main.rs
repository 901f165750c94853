//! Failover coordinator daemon.
//!
//! Runs next to a PgBouncer instance and exposes the pause/resume/health
//! control surface to the switchover orchestrator. The change stream is a
//! library concern consumed on the orchestrator side, not started here.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use failover_coordinator::api::{ApiServer, AuthPolicy};
use failover_coordinator::config::{load_config, FailoverConfig};
use failover_coordinator::lifecycle::{signals, Shutdown};
use failover_coordinator::pooler::PgBouncerAdmin;
use failover_coordinator::FailoverCoordinator;

#[derive(Parser)]
#[command(name = "failover-coordinator")]
#[command(about = "PgBouncer pause/resume coordinator for controlled failovers", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "failover_coordinator=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("failover-coordinator v{} starting", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => FailoverConfig::default(),
    };

    let pooler_addr = format!("{}:{}", config.pooler.host, config.pooler.port);
    let auth_mode = if config.api.auth_token.is_empty() {
        "disabled"
    } else {
        "bearer"
    };
    tracing::info!(
        bind_address = %config.api.bind_address,
        pooler = %pooler_addr,
        auth = auth_mode,
        "configuration loaded"
    );

    let pooler = Arc::new(PgBouncerAdmin::new(&config.pooler));
    let coordinator = Arc::new(FailoverCoordinator::new(
        pooler,
        Duration::from_millis(config.pooler.exec_timeout_ms),
    ));

    let shutdown = Shutdown::new();
    tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    let listener = TcpListener::bind(&config.api.bind_address).await?;
    let server = ApiServer::new(coordinator, AuthPolicy::from_configured(&config.api.auth_token));
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
