//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Routing, dispatch and reload produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through dispatch log events
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
