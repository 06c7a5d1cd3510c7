//! Resources: what a matched route resolves to.
//!
//! # Data Flow
//! ```text
//! Declaration time:
//!     response map + capability overrides
//!     → builder.rs (merge over defaults, derive media types)
//!     → Resource (immutable, shared via Arc)
//!
//! Request time:
//!     state machine reads capabilities.rs hooks
//!     → picks a responder by content type
//!     → Output (body or full response)
//! ```

pub mod builder;
pub mod capabilities;

pub use builder::{
    error_resource, halt_resource, halt_resource_with, make_resource, HandlerFn, Output,
    Resource, Responder, ResponseMap, ANY_MEDIA_TYPE,
};
pub use capabilities::{default_capabilities, Capabilities, Capability, Decision, Hook};
