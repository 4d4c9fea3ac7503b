//! httpbench: HTTP benchmarking target.
//!
//! - `/`      : constant message
//! - `/json`  : synthetic JSON payload
//! - `/stats` : request total, uptime, runtime version
//!
//! Stops on Ctrl+C or SIGTERM after draining in-flight requests.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use httpbench_core::error::Result;
use httpbench_server::{
    config::{self, BenchConfig, Overrides},
    Server,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Host to listen on [default: 127.0.0.1]
    host: Option<String>,

    /// Port to listen on [default: 8000]
    port: Option<u16>,

    /// Number of pool workers [default: 10]
    #[clap(short, long)]
    workers: Option<usize>,

    /// Path of a YAML config file
    #[clap(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "httpbench failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let cfg = match args.config.as_deref() {
        Some(path) => config::load_from_file(path)?,
        None => BenchConfig::default(),
    };
    let cfg = config::apply_overrides(
        cfg,
        Overrides {
            host: args.host,
            port: args.port,
            workers: args.workers,
        },
    )?;

    let server = Server::bind(cfg.server).await?;
    server.serve(shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
