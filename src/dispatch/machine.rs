//! Request lifecycle state machine.
//!
//! The dispatcher hands every routed request to a [`StateMachine`]. The
//! machine owns all HTTP semantics beyond routing. [`BasicMachine`] is the
//! reference implementation: a short decision chain over the resource's
//! hooks plus `Accept` header media-type selection.
//!
//! # Decision chain
//! ```text
//! service available? ── no ──▶ 503
//! method allowed?    ── no ──▶ 405 (+ Allow)
//! authorized?        ── no ──▶ 401
//! allowed?           ── no ──▶ 403
//! acceptable type?   ── no ──▶ 406
//! exists?            ── no ──▶ 404
//! responder output   ───────▶ 200 (body) | response as-is
//! ```

use axum::http::{header, HeaderValue, StatusCode};

use crate::http::{Request, Response};
use crate::resource::{Hook, Output, Resource, ANY_MEDIA_TYPE};

/// Runs a request against the resource its route resolved to.
pub trait StateMachine: Send + Sync {
    fn run(&self, request: &Request, resource: &Resource) -> Response;
}

impl<F> StateMachine for F
where
    F: Fn(&Request, &Resource) -> Response + Send + Sync,
{
    fn run(&self, request: &Request, resource: &Resource) -> Response {
        self(request, resource)
    }
}

/// Reference state machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicMachine;

impl StateMachine for BasicMachine {
    fn run(&self, request: &Request, resource: &Resource) -> Response {
        let caps = resource.capabilities();

        if !caps.decide(Hook::ServiceAvailable, request) {
            return Response::new(StatusCode::SERVICE_UNAVAILABLE);
        }

        if !caps.allows_method(&request.method) {
            let allow = caps
                .allowed_methods()
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let mut response = Response::new(StatusCode::METHOD_NOT_ALLOWED);
            if let Ok(value) = HeaderValue::from_str(&allow) {
                response.headers.insert(header::ALLOW, value);
            }
            return response;
        }

        if !caps.decide(Hook::Authorized, request) {
            return Response::new(StatusCode::UNAUTHORIZED);
        }
        if !caps.decide(Hook::Allowed, request) {
            return Response::new(StatusCode::FORBIDDEN);
        }

        let accept = request.header(header::ACCEPT.as_str());
        let Some(media_type) = negotiate(accept, caps.media_types()) else {
            return Response::new(StatusCode::NOT_ACCEPTABLE);
        };

        if !caps.decide(Hook::Exists, request) {
            return Response::not_found();
        }

        let Some(responder) = resource.responses().get(media_type) else {
            return Response::new(StatusCode::NOT_ACCEPTABLE);
        };

        match responder.respond(request) {
            Output::Response(response) => response,
            Output::Body(body) => {
                let mut response = Response::new(StatusCode::OK).with_body(body);
                if !media_type.contains('*') {
                    if let Ok(value) = HeaderValue::from_str(media_type) {
                        response.headers.insert(header::CONTENT_TYPE, value);
                    }
                }
                response
            }
        }
    }
}

/// Pick the first offered media type the `Accept` header admits.
///
/// Ranges are tried by descending q-value, then header order; offers are
/// tried in declaration order. A missing header accepts anything, and a
/// `*/*` offer is served even when the header rules everything out.
pub fn negotiate<'a>(accept: Option<&str>, offered: &'a [String]) -> Option<&'a str> {
    let mut ranges: Vec<(&str, f32)> = accept
        .unwrap_or(ANY_MEDIA_TYPE)
        .split(',')
        .filter_map(parse_range)
        .filter(|(_, q)| *q > 0.0)
        .collect();
    if ranges.is_empty() && accept.map_or(true, |a| a.trim().is_empty()) {
        ranges.push((ANY_MEDIA_TYPE, 1.0));
    }
    ranges.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranges
        .iter()
        .find_map(|(range, _)| {
            offered
                .iter()
                .find(|offer| media_matches(range, offer))
                .map(String::as_str)
        })
        .or_else(|| {
            offered
                .iter()
                .find(|offer| *offer == ANY_MEDIA_TYPE)
                .map(String::as_str)
        })
}

fn parse_range(raw: &str) -> Option<(&str, f32)> {
    let mut parts = raw.split(';').map(str::trim);
    let range = parts.next().filter(|r| !r.is_empty())?;
    let q = parts
        .filter_map(|p| p.strip_prefix("q="))
        .find_map(|q| q.parse::<f32>().ok())
        .unwrap_or(1.0);
    Some((range, q))
}

fn media_matches(range: &str, offer: &str) -> bool {
    if range == ANY_MEDIA_TYPE || offer == ANY_MEDIA_TYPE {
        return true;
    }
    let offer_base = offer.split(';').next().unwrap_or(offer).trim();
    match (range.strip_suffix("/*"), offer_base.strip_suffix("/*")) {
        (Some(kind), _) => offer_base
            .split('/')
            .next()
            .is_some_and(|k| k.eq_ignore_ascii_case(kind)),
        (None, Some(kind)) => range
            .split('/')
            .next()
            .is_some_and(|k| k.eq_ignore_ascii_case(kind)),
        (None, None) => range.eq_ignore_ascii_case(offer_base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Body;
    use crate::resource::{
        error_resource, halt_resource, make_resource, Capability, Responder, ResponseMap,
    };
    use axum::http::Method;
    use std::collections::BTreeMap;

    fn offers(types: &[&str]) -> Vec<String> {
        types.iter().map(|t| t.to_string()).collect()
    }

    fn todo_resource() -> Resource {
        make_resource(
            ResponseMap::new()
                .with("application/json", serde_json::json!({"id": 1}))
                .with("text/plain", "todo 1"),
            BTreeMap::new(),
        )
    }

    #[test]
    fn test_negotiate_defaults_to_first_offer() {
        let offered = offers(&["application/json", "text/plain"]);
        assert_eq!(negotiate(None, &offered), Some("application/json"));
        assert_eq!(negotiate(Some(""), &offered), Some("application/json"));
    }

    #[test]
    fn test_negotiate_respects_q_values() {
        let offered = offers(&["application/json", "text/plain"]);
        assert_eq!(
            negotiate(Some("application/json;q=0.5, text/plain"), &offered),
            Some("text/plain")
        );
        assert_eq!(negotiate(Some("text/*"), &offered), Some("text/plain"));
        assert_eq!(negotiate(Some("image/png"), &offered), None);
        assert_eq!(negotiate(Some("text/plain;q=0"), &offered), None);
    }

    #[test]
    fn test_any_offer_serves_everything() {
        let offered = offers(&["*/*"]);
        assert_eq!(negotiate(Some("image/png"), &offered), Some("*/*"));
        assert_eq!(negotiate(Some("x/y;q=0"), &offered), Some("*/*"));
        assert_eq!(negotiate(Some("*/*;q=0"), &offered), Some("*/*"));

        let offered = offers(&["text/plain", "*/*"]);
        assert_eq!(negotiate(Some("text/plain;q=0"), &offered), Some("*/*"));
    }

    #[test]
    fn test_run_body_gets_content_type() {
        let request = Request::get("/todos/1").with_header("accept", "text/plain");
        let response = BasicMachine.run(&request, &todo_resource());
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.headers[header::CONTENT_TYPE], "text/plain");
        assert_eq!(response.body, Body::Text("todo 1".into()));
    }

    #[test]
    fn test_run_not_acceptable() {
        let request = Request::get("/todos/1").with_header("accept", "image/png");
        let response = BasicMachine.run(&request, &todo_resource());
        assert_eq!(response.status, StatusCode::NOT_ACCEPTABLE);
    }

    #[test]
    fn test_run_method_not_allowed() {
        let request = Request::new(Method::DELETE, "/todos/1");
        let response = BasicMachine.run(&request, &todo_resource());
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers[header::ALLOW], "GET, HEAD");
    }

    #[test]
    fn test_run_respects_hooks() {
        let cases = [
            (Hook::ServiceAvailable, StatusCode::SERVICE_UNAVAILABLE),
            (Hook::Authorized, StatusCode::UNAUTHORIZED),
            (Hook::Allowed, StatusCode::FORBIDDEN),
            (Hook::Exists, StatusCode::NOT_FOUND),
        ];
        for (hook, expected) in cases {
            let resource = make_resource(
                ResponseMap::new().with("text/plain", "hi"),
                BTreeMap::from([(hook, Capability::Flag(false))]),
            );
            let response = BasicMachine.run(&Request::get("/"), &resource);
            assert_eq!(response.status, expected, "{hook:?}");
        }
    }

    #[test]
    fn test_run_halt_ignores_negotiation() {
        let request = Request::get("/").with_header("accept", "image/png");
        let response = BasicMachine.run(&request, &halt_resource(StatusCode::FORBIDDEN));
        assert_eq!(response, Response::new(StatusCode::FORBIDDEN));
    }

    #[test]
    fn test_run_halt_and_error_are_unconditional() {
        let halt = halt_resource(StatusCode::FORBIDDEN);
        let error = error_resource("boom");
        for method in [Method::GET, Method::POST, Method::DELETE, Method::PUT] {
            for accept in [None, Some("x/y;q=0"), Some("text/html;q=0"), Some("image/png")] {
                let mut request = Request::new(method.clone(), "/admin/x");
                if let Some(accept) = accept {
                    request = request.with_header("accept", accept);
                }
                assert_eq!(
                    BasicMachine.run(&request, &halt),
                    Response::new(StatusCode::FORBIDDEN),
                    "{method} {accept:?}"
                );
                assert_eq!(
                    BasicMachine.run(&request, &error),
                    Response::new(StatusCode::INTERNAL_SERVER_ERROR).with_body("boom"),
                    "{method} {accept:?}"
                );
            }
        }
    }

    #[test]
    fn test_handler_sees_path_info() {
        let resource = make_resource(
            ResponseMap::new().with(
                "text/plain",
                Responder::handler(|req| Output::Body(req.param("id").unwrap_or("").into())),
            ),
            BTreeMap::new(),
        );
        let mut request = Request::get("/todos/5");
        request.path_info.insert("id".into(), "5".into());
        let response = BasicMachine.run(&request, &resource);
        assert_eq!(response.body, Body::Text("5".into()));
    }
}
