//! OS signal handling.
//!
//! # Responsibilities
//! - Translate SIGTERM/SIGINT into the shutdown broadcast
//! - Translate SIGHUP into a forced refresh of auto-refreshed sources

use std::sync::Arc;

use crate::lifecycle::shutdown::Shutdown;
use crate::watch::SourceRefresher;

#[cfg(unix)]
pub async fn run(shutdown: Arc<Shutdown>, refreshers: Vec<SourceRefresher>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to register SIGTERM handler");
            return;
        }
    };
    let mut sigint = match signal(SignalKind::interrupt()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to register SIGINT handler");
            return;
        }
    };
    let mut sighup = match signal(SignalKind::hangup()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to register SIGHUP handler");
            return;
        }
    };

    loop {
        tokio::select! {
            _ = sigterm.recv() => {
                tracing::info!("SIGTERM received, shutting down");
                shutdown.trigger();
                break;
            }
            _ = sigint.recv() => {
                tracing::info!("SIGINT received, shutting down");
                shutdown.trigger();
                break;
            }
            _ = sighup.recv() => {
                tracing::info!(sources = refreshers.len(), "SIGHUP received, forcing refresh");
                for refresher in &refreshers {
                    refresher.refresh().await;
                }
            }
        }
    }
}

#[cfg(not(unix))]
pub async fn run(shutdown: Arc<Shutdown>, _refreshers: Vec<SourceRefresher>) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Ctrl-C received, shutting down");
        shutdown.trigger();
    }
}
