//! Config file watching for hot reload.
//!
//! The watcher observes the file's parent directory, so saves that replace
//! the file through a rename keep triggering reloads. Bursts of events are
//! collapsed: a reload runs once the file has been quiet for the configured
//! debounce window.
//!
//! A reload is refused, and the current routes kept, when the file is blank
//! or when it declares no routes while routes are being served. The second
//! check can be lifted with `reload.allow_empty_routes`.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::thread;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::parse_config;
use crate::config::schema::RouterConfig;

/// Watches a config file and sends every accepted update.
pub struct ConfigWatcher {
    path: PathBuf,
    debounce: Duration,
    allow_empty_routes: bool,
    /// Route count of the config currently in effect.
    serving_routes: usize,
    update_tx: mpsc::UnboundedSender<RouterConfig>,
}

impl ConfigWatcher {
    /// Watch `path`, whose contents are currently served as `current`.
    pub fn new(
        path: &Path,
        current: &RouterConfig,
    ) -> (Self, mpsc::UnboundedReceiver<RouterConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            debounce: Duration::from_millis(current.reload.debounce_ms),
            allow_empty_routes: current.reload.allow_empty_routes,
            serving_routes: current.routes.len(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Reloads stop when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let file_name = self
            .path
            .file_name()
            .map(OsString::from)
            .ok_or_else(|| notify::Error::generic("config path has no file name"))?;
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (event_tx, event_rx) = std_mpsc::channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    let relevant = (event.kind.is_modify() || event.kind.is_create())
                        && event
                            .paths
                            .iter()
                            .any(|p| p.file_name() == Some(file_name.as_os_str()));
                    if relevant {
                        let _ = event_tx.send(());
                    }
                }
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(
            path = %self.path.display(),
            debounce_ms = self.debounce.as_millis() as u64,
            "Config watcher started"
        );

        thread::Builder::new()
            .name("config-reload".into())
            .spawn(move || self.reload_on(event_rx))
            .map_err(notify::Error::io)?;

        Ok(watcher)
    }

    fn reload_on(mut self, events: std_mpsc::Receiver<()>) {
        while events.recv().is_ok() {
            while events.recv_timeout(self.debounce).is_ok() {}
            self.reload();
            if self.update_tx.is_closed() {
                break;
            }
        }
        tracing::debug!(path = %self.path.display(), "Config watcher stopped");
    }

    fn reload(&mut self) {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(error = %e, "Config file unreadable, keeping current routes");
                return;
            }
        };
        if content.trim().is_empty() {
            tracing::warn!("Config file is blank, keeping current routes");
            return;
        }

        let config = match parse_config(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Config reload rejected, keeping current routes");
                return;
            }
        };
        if config.routes.is_empty() && self.serving_routes > 0 && !self.allow_empty_routes {
            tracing::warn!(
                serving_routes = self.serving_routes,
                "Config declares no routes, keeping current routes \
                 (set reload.allow_empty_routes to accept)"
            );
            return;
        }

        tracing::info!(routes = config.routes.len(), "Config reload accepted");
        self.serving_routes = config.routes.len();
        self.allow_empty_routes = config.reload.allow_empty_routes;
        self.debounce = Duration::from_millis(config.reload.debounce_ms);
        let _ = self.update_tx.send(config);
    }
}
