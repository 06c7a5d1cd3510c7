//! Resource construction.
//!
//! A resource pairs a capability map with a response map keyed by
//! content-type signature (`"application/json"`, `"*/*"`, ...). Signatures
//! are opaque strings; nothing here validates them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use axum::http::StatusCode;

use crate::http::{Body, Request, Response};
use crate::resource::capabilities::{Capabilities, Capability, Hook};

/// Media range served by halt and error resources.
pub const ANY_MEDIA_TYPE: &str = "*/*";

/// Callback producing the output for one content type.
pub type HandlerFn = Arc<dyn Fn(&Request) -> Output + Send + Sync>;

/// What a responder yields.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// A body; status and headers are left to the state machine.
    Body(Body),
    /// A complete response, returned as-is.
    Response(Response),
}

/// Produces the output for one content type.
#[derive(Clone)]
pub enum Responder {
    Static(Body),
    Handler(HandlerFn),
}

impl Responder {
    pub fn handler<F>(f: F) -> Self
    where
        F: Fn(&Request) -> Output + Send + Sync + 'static,
    {
        Responder::Handler(Arc::new(f))
    }

    pub fn respond(&self, request: &Request) -> Output {
        match self {
            Responder::Static(body) => Output::Body(body.clone()),
            Responder::Handler(f) => f(request),
        }
    }
}

impl fmt::Debug for Responder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Responder::Static(body) => f.debug_tuple("Static").field(body).finish(),
            Responder::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

impl From<Body> for Responder {
    fn from(body: Body) -> Self {
        Responder::Static(body)
    }
}

impl From<&str> for Responder {
    fn from(text: &str) -> Self {
        Responder::Static(text.into())
    }
}

impl From<String> for Responder {
    fn from(text: String) -> Self {
        Responder::Static(text.into())
    }
}

impl From<serde_json::Value> for Responder {
    fn from(value: serde_json::Value) -> Self {
        Responder::Static(value.into())
    }
}

/// Content-type signature to responder, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ResponseMap {
    entries: Vec<(String, Responder)>,
}

impl ResponseMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the responder for `media_type`.
    pub fn insert(&mut self, media_type: impl Into<String>, responder: impl Into<Responder>) {
        let media_type = media_type.into();
        let responder = responder.into();
        match self.entries.iter_mut().find(|(key, _)| *key == media_type) {
            Some(entry) => entry.1 = responder,
            None => self.entries.push((media_type, responder)),
        }
    }

    pub fn with(mut self, media_type: impl Into<String>, responder: impl Into<Responder>) -> Self {
        self.insert(media_type, responder);
        self
    }

    pub fn get(&self, media_type: &str) -> Option<&Responder> {
        self.entries
            .iter()
            .find(|(key, _)| key == media_type)
            .map(|(_, responder)| responder)
    }

    pub fn media_types(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Immutable handler unit a route resolves to.
#[derive(Debug, Clone)]
pub struct Resource {
    capabilities: Capabilities,
    responses: ResponseMap,
}

impl Resource {
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn responses(&self) -> &ResponseMap {
        &self.responses
    }
}

/// Build a resource from its responses and capability overrides.
pub fn make_resource(responses: ResponseMap, overrides: BTreeMap<Hook, Capability>) -> Resource {
    let media_types = responses.media_types().map(str::to_string).collect();
    Resource {
        capabilities: Capabilities::resolve(overrides, media_types),
        responses,
    }
}

/// Resource answering every request with `status` and no headers.
pub fn halt_resource(status: StatusCode) -> Resource {
    halt_resource_with(Response::new(status))
}

/// Resource answering every request with `response`, whatever its method.
///
/// Typically built from [`Response::new`] plus extra headers or a body.
pub fn halt_resource_with(response: Response) -> Resource {
    let responder = Responder::handler(move |_| Output::Response(response.clone()));
    make_resource(
        ResponseMap::new().with(ANY_MEDIA_TYPE, responder),
        BTreeMap::from([(Hook::AllowedMethods, Capability::AnyMethod)]),
    )
}

/// Resource answering every request with `500` and `message` as body.
pub fn error_resource(message: impl Into<String>) -> Resource {
    halt_resource_with(
        Response::new(StatusCode::INTERNAL_SERVER_ERROR).with_body(Body::Text(message.into())),
    )
}
