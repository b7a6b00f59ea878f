//! HTTP server lifecycle.

use std::future::Future;
use std::net::SocketAddr;

use covwatch_core::api::ServerConfig;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::http::{routes::create_router, AppState};

pub async fn bind(config: &ServerConfig) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!(
        target: "covwatch.http",
        "Report server listening on {}",
        local_url(listener.local_addr()?)
    );
    Ok(listener)
}

/// Serve until Ctrl+C or SIGTERM.
pub async fn start_server(config: &ServerConfig, state: AppState) -> std::io::Result<()> {
    let listener = bind(config).await?;
    serve_with_shutdown(listener, state, shutdown_signal()).await
}

pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            info!(target: "covwatch.http", "Starting graceful shutdown...");
        })
        .await?;

    info!(target: "covwatch.http", "Server shutdown complete");
    Ok(())
}

pub fn local_url(addr: SocketAddr) -> String {
    format!("http://{addr}/")
}

async fn shutdown_signal() {
    tokio::select! {
        res = signal::ctrl_c() => match res {
            Ok(()) => info!(target: "covwatch.http", "Received Ctrl+C signal"),
            Err(err) => {
                error!(target: "covwatch.http", error = %err, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        },
        _ = wait_for_sigterm() => {
            info!(target: "covwatch.http", "Received SIGTERM signal");
        }
    }
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(err) => {
            error!(target: "covwatch.http", error = %err, "Failed to install SIGTERM handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}
