//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, buffer body, build Request record)
//!     → [dispatch layer routes and runs the resource]
//!     → response.rs (Response record → wire response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, Request, X_REQUEST_ID};
pub use response::{Body, Response, NOT_FOUND_BODY};
pub use server::HttpServer;
