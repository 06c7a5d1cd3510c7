//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for Ctrl+C (SIGINT)
//! - Translate it into a shutdown trigger
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Route reloads come from the file watcher, not from signals

use crate::lifecycle::shutdown::Shutdown;

/// Trigger `shutdown` once Ctrl+C is received.
pub async fn shutdown_on_ctrl_c(shutdown: Shutdown) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Ctrl+C received, shutting down");
    shutdown.trigger();
}
