//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Request (path, headers, body)
//!     → dispatcher.rs (current table, tokenize, select)
//!     → merge path info into a request copy
//!     → machine.rs (run request against the resource)
//!     → Response, returned unchanged
//!
//! No route matched:
//!     → 404 "Resource not found", machine never called
//! ```

pub mod dispatcher;
pub mod machine;

pub use dispatcher::{Dispatcher, Endpoint, RawDispatcher, SharedRoutes, TableSource};
pub use machine::{negotiate, BasicMachine, StateMachine};
