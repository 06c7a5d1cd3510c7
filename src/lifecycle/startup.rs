//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging and metrics
//! - Build the route table and server
//! - Bind the listener and start the config watcher
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::path::Path;

use notify::RecommendedWatcher;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::{load_config, ConfigError, ConfigWatcher, RouterConfig};
use crate::http::HttpServer;
use crate::observability::{logging, metrics};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("bind failed: {0}")]
    Bind(#[from] std::io::Error),

    #[error("config watcher: {0}")]
    Watch(#[from] notify::Error),
}

/// Everything `main` needs to serve.
pub struct Started {
    pub server: HttpServer,
    pub listener: TcpListener,
    pub config_updates: mpsc::UnboundedReceiver<RouterConfig>,
    /// Dropping the watcher stops reloads.
    pub watcher: Option<RecommendedWatcher>,
}

/// Load the config at `path` (or defaults) and validate it.
pub fn load(path: Option<&Path>) -> Result<RouterConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(RouterConfig::default()),
    }
}

/// Bring the router up from the config at `path`.
pub async fn start(path: Option<&Path>) -> Result<Started, StartupError> {
    let config = load(path)?;
    logging::init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let (watcher, config_updates) = match path {
        Some(path) if config.reload.watch => {
            let (watcher, updates) = ConfigWatcher::new(path, &config);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;
    let listener = TcpListener::bind(&bind_address).await?;

    Ok(Started {
        server,
        listener,
        config_updates,
        watcher,
    })
}
