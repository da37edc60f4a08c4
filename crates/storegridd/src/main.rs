//! storegridd — the StoreGrid daemon.
//!
//! Single binary that assembles the provisioning control plane:
//! - kubectl-backed cluster client
//! - helm-backed release manager
//! - provisioning orchestrator (guardrail, identity, readiness polling)
//! - audit log
//! - REST API
//!
//! # Usage
//!
//! ```text
//! storegridd serve --port 8080 --chart ./helm/store
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;

use store_core::ProvisionConfig;
use storegrid_audit::AuditLog;
use storegrid_cluster::KubectlClient;
use storegrid_provision::Orchestrator;
use storegrid_release::HelmReleaseManager;

#[derive(Parser)]
#[command(name = "storegridd", about = "StoreGrid provisioning daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the provisioning API server.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value = "8080")]
        port: u16,

        /// Optional TOML configuration file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Chart reference installed for every store.
        #[arg(long)]
        chart: Option<String>,

        /// Values file applied to every install.
        #[arg(long)]
        values: Option<String>,

        /// Maximum concurrently active stores.
        #[arg(long)]
        max_stores: Option<usize>,

        /// Local domain for store hostnames.
        #[arg(long)]
        domain: Option<String>,

        /// Readiness polling attempt budget.
        #[arg(long)]
        poll_attempts: Option<u32>,

        /// Seconds between readiness polls.
        #[arg(long)]
        poll_interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,storegridd=debug,storegrid=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            config,
            chart,
            values,
            max_stores,
            domain,
            poll_attempts,
            poll_interval,
        } => {
            let mut provision = match &config {
                Some(path) => ProvisionConfig::from_file(path)?,
                None => ProvisionConfig::default(),
            };
            provision = provision.apply_env();

            // Flags win over file and environment.
            if let Some(v) = chart {
                provision.chart = v;
            }
            if let Some(v) = values {
                provision.values_file = Some(v);
            }
            if let Some(v) = max_stores {
                provision.max_stores = v;
            }
            if let Some(v) = domain {
                provision.domain = v;
            }
            if let Some(v) = poll_attempts {
                provision.poll_attempts = v;
            }
            if let Some(v) = poll_interval {
                provision.poll_interval_secs = v;
            }

            run_serve(port, provision).await
        }
    }
}

async fn run_serve(port: u16, config: ProvisionConfig) -> anyhow::Result<()> {
    info!("StoreGrid daemon starting");
    info!(
        max_stores = config.max_stores,
        chart = %config.chart,
        domain = %config.domain,
        poll_attempts = config.poll_attempts,
        "provisioning configuration loaded"
    );

    let cluster = Arc::new(KubectlClient::new());
    let releases = Arc::new(HelmReleaseManager::new());
    let audit = AuditLog::new();

    let orchestrator = Arc::new(Orchestrator::new(config, cluster, releases, audit));
    info!("orchestrator initialized");

    let router = storegrid_api::build_router(Arc::clone(&orchestrator));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(%addr, "API server starting");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C; cancels in-flight readiness polls.
    let shutdown_orchestrator = Arc::clone(&orchestrator);
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
        info!("shutdown signal received");
        shutdown_orchestrator.shutdown();
    });

    server.await?;

    info!("StoreGrid daemon stopped");
    Ok(())
}
