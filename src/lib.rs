//! URI routing and resource dispatch.
//!
//! A request path is tokenized, matched against an ordered route table
//! (first match wins), and the winning route's resource is handed to a
//! request lifecycle state machine together with the captured path
//! parameters. Unrouted requests get a plain 404.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resource;
pub mod routing;

pub use config::schema::RouterConfig;
pub use dispatch::{BasicMachine, Dispatcher, RawDispatcher, SharedRoutes, StateMachine};
pub use http::{HttpServer, Request, Response};
pub use lifecycle::Shutdown;
pub use resource::{error_resource, halt_resource, halt_resource_with, make_resource, Resource};
pub use routing::{RoutePattern, RouteTable};
