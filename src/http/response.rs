//! Response records.
//!
//! # Responsibilities
//! - Define the response produced by resources and the state machine
//! - Provide the canned not-found response for unrouted requests
//! - Convert into an axum response for the wire
//!
//! # Design Decisions
//! - Plain data: comparable with `==`, cloneable, no streaming
//! - Content type is only set when a body variant implies one and the
//!   producer did not set it already

use axum::body::{Body as AxumBody, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;

/// Body returned for unrouted requests.
pub const NOT_FOUND_BODY: &str = "Resource not found";

/// Response payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Body {
    #[default]
    Empty,
    Text(String),
    Json(serde_json::Value),
    Bytes(Bytes),
}

impl Body {
    pub fn is_empty(&self) -> bool {
        match self {
            Body::Empty => true,
            Body::Text(text) => text.is_empty(),
            Body::Json(_) => false,
            Body::Bytes(bytes) => bytes.is_empty(),
        }
    }

    fn content_type(&self) -> Option<&'static str> {
        match self {
            Body::Text(_) => Some("text/plain; charset=utf-8"),
            Body::Json(_) => Some("application/json"),
            Body::Empty | Body::Bytes(_) => None,
        }
    }

    fn into_bytes(self) -> Bytes {
        match self {
            Body::Empty => Bytes::new(),
            Body::Text(text) => Bytes::from(text),
            Body::Json(value) => Bytes::from(value.to_string()),
            Body::Bytes(bytes) => bytes,
        }
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        Body::Json(value)
    }
}

/// Response record.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Body,
}

impl Response {
    /// A response with no headers and no body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Body::Empty,
        }
    }

    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// `404` with `"Resource not found"` and no headers.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND).with_body(NOT_FOUND_BODY)
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        let content_type = self.body.content_type();
        let mut response = axum::response::Response::new(AxumBody::from(self.body.into_bytes()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;

        if let Some(content_type) = content_type {
            response
                .headers_mut()
                .entry(header::CONTENT_TYPE)
                .or_insert(HeaderValue::from_static(content_type));
        }
        response
    }
}
