//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.
//!
//! ```toml
//! [listener]
//! bind_address = "0.0.0.0:8080"
//!
//! [[routes]]
//! name = "todo"
//! pattern = "/todos/:id"
//!
//! [routes.resource]
//! kind = "static"
//! template = true
//! responses = { "text/plain" = "todo {id}" }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the router.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Hot reload settings.
    pub reload: ReloadConfig,

    /// Routes, tried in this order. First match wins.
    pub routes: Vec<RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Largest request body buffered before dispatch, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Address the exporter listens on.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "resource_router=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Hot reload configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ReloadConfig {
    /// Watch the config file and swap in new routes on change.
    pub watch: bool,

    /// Quiet period after the last file event before reloading.
    pub debounce_ms: u64,

    /// Accept a reload that declares no routes while routes are served.
    pub allow_empty_routes: bool,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            watch: true,
            debounce_ms: 250,
            allow_empty_routes: false,
        }
    }
}

/// A route declaration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Pattern string, e.g. `/todos/:id/*`.
    pub pattern: String,

    /// What the route resolves to.
    pub resource: ResourceConfig,
}

/// Resource declared in configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResourceConfig {
    /// Fixed bodies per content type.
    Static {
        /// Content type to body. Offered in lexical order of content type.
        responses: BTreeMap<String, String>,

        /// Methods accepted (default: GET, HEAD).
        #[serde(default)]
        allowed_methods: Option<Vec<String>>,

        /// Substitute `{param}` with captured path values.
        #[serde(default)]
        template: bool,
    },

    /// Fixed status for every request.
    Halt {
        status: u16,

        #[serde(default)]
        body: Option<String>,
    },

    /// `500` with a message.
    Error { message: String },
}
