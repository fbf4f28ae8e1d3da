//! pagechat-relay server entry point.
//!
//! Starts the Axum HTTP server with the `/ws` relay and the history lookup.

use std::net::IpAddr;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pagechat_relay::app;
use pagechat_relay::app_state::AppState;
use pagechat_relay::config::RelayConfig;

#[derive(Parser, Debug)]
#[command(name = "pagechat-relay")]
#[command(about = "Per-website chat relay over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind to (overrides BIND_HOST)
    #[arg(short = 'H', long)]
    host: Option<IpAddr>,

    /// Port to listen on (overrides PORT, default 8080)
    #[arg(short = 'p', long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!(error = ?e, "relay failed");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = RelayConfig::from_env()
        .context("invalid configuration")?
        .with_listen_overrides(args.host, args.port);

    init_tracing(config.log_json);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "pagechat-relay");

    let state = AppState::from_config(&config).await;

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("cannot bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "http server started");

    app::serve(listener, state, shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shutdown complete");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
