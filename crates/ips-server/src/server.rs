//! Process bootstrap: logging and the listener loop.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::router::build_router_with_prefix;
use crate::state::AppState;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` overrides the default of `info` for this workspace and
/// `tower_http` (access logs).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ips_server=info,ips=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Binds `config.bind_addr()` and serves until Ctrl+C or SIGTERM.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let state = AppState::new(&config);
    let sweeps = state.start_expiry_sweeps();
    let app = build_router_with_prefix(state, config.route_prefix.as_deref());

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        "{} service listening on {}{}",
        config.kind,
        addr,
        config.route_prefix.as_deref().unwrap_or("")
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for sweep in sweeps {
        sweep.abort();
    }
    tracing::info!("{} service stopped", config.kind);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!("failed to install SIGTERM handler: {}", err);
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
    tracing::info!("shutdown signal received");
}
