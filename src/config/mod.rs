//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → routes.rs (build RouteTable)
//!     → shared via SharedRoutes to the dispatcher
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server rebuilds the table and swaps it atomically
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - A rejected reload keeps the current routes

pub mod loader;
pub mod routes;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use routes::{build_resource, build_route_table};
pub use schema::{
    ListenerConfig, LogFormat, ObservabilityConfig, ReloadConfig, ResourceConfig, RouteConfig,
    RouterConfig, TimeoutConfig,
};
pub use validation::{validate_config, validate_routes, ValidationError};
pub use watcher::ConfigWatcher;
