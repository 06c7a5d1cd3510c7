//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Buffer the body under a size limit
//! - Convert the axum request into the router's [`Request`] record
//! - Merge captured path info into a copy before dispatch
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Original request preserved; the merged copy is what gets dispatched

use axum::body::{Body as AxumBody, Bytes};
use axum::http::{self, HeaderMap, HeaderValue, Method, StatusCode};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::routing::PathInfo;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request record handed to the dispatcher and the resource.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
    /// Parameters captured by the matched route.
    pub path_info: PathInfo,
    pub request_id: Option<String>,
}

impl Request {
    /// A bodiless request for `path`.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// A copy of this request with `path_info` merged over its own.
    ///
    /// Captured values win on name collisions.
    pub fn merged_with(&self, path_info: PathInfo) -> Self {
        let mut merged = self.clone();
        merged.path_info.extend(path_info);
        merged
    }

    /// Captured path parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.path_info.get(name).map(String::as_str)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Convert an incoming axum request, buffering at most `body_limit` bytes.
    ///
    /// An oversized body yields `413 Payload Too Large`.
    pub async fn from_http(
        request: http::Request<AxumBody>,
        body_limit: usize,
    ) -> Result<Self, StatusCode> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, body_limit)
            .await
            .map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)?;

        let request_id = parts
            .headers
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers,
            body,
            path_info: PathInfo::new(),
            request_id,
        })
    }
}

/// Generates UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}
