//! Route dispatch.
//!
//! # Responsibilities
//! - Tokenize the request path and select a route
//! - Merge captured path info into a copy of the request
//! - Hand request and resource to the state machine, return its response
//! - Answer unrouted requests with the canned 404
//!
//! # Design Decisions
//! - The route table comes from an injected [`TableSource`], never a global
//! - One atomic load of the table per request; no locks on the hot path
//! - The state machine's response is passed through untouched

use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;

use crate::dispatch::machine::StateMachine;
use crate::http::{Request, Response};
use crate::observability::metrics;
use crate::resource::Resource;
use crate::routing::{tokenize, RouteTable};

/// Provides the route table to use for the current request.
pub trait TableSource: Send + Sync {
    fn current(&self) -> Arc<RouteTable>;
}

impl<F> TableSource for F
where
    F: Fn() -> Arc<RouteTable> + Send + Sync,
{
    fn current(&self) -> Arc<RouteTable> {
        self()
    }
}

/// Atomically swappable route table shared between the server and reloads.
#[derive(Debug, Clone)]
pub struct SharedRoutes {
    inner: Arc<ArcSwap<RouteTable>>,
}

impl SharedRoutes {
    pub fn new(table: RouteTable) -> Self {
        metrics::record_route_count(table.len());
        Self {
            inner: Arc::new(ArcSwap::from_pointee(table)),
        }
    }

    /// Install `table` for all subsequent requests.
    pub fn replace(&self, table: RouteTable) {
        metrics::record_route_count(table.len());
        self.inner.store(Arc::new(table));
    }
}

impl TableSource for SharedRoutes {
    fn current(&self) -> Arc<RouteTable> {
        self.inner.load_full()
    }
}

/// Anything the HTTP layer can hand a request to.
pub trait Endpoint: Send + Sync {
    fn handle(&self, request: Request) -> Response;
}

/// Routes requests through a route table.
#[derive(Clone)]
pub struct Dispatcher {
    routes: Arc<dyn TableSource>,
    machine: Arc<dyn StateMachine>,
}

impl Dispatcher {
    pub fn new(routes: impl TableSource + 'static, machine: impl StateMachine + 'static) -> Self {
        Self {
            routes: Arc::new(routes),
            machine: Arc::new(machine),
        }
    }

    /// Route `request` and run it, or answer 404 when nothing matches.
    pub fn handle(&self, request: Request) -> Response {
        let start = Instant::now();
        let table = self.routes.current();
        let tokens = tokenize(&request.path);

        let Some(selected) = table.select(&tokens) else {
            tracing::debug!(
                request_id = request.request_id.as_deref().unwrap_or("unknown"),
                path = %request.path,
                "No route matched"
            );
            metrics::record_no_match();
            return Response::not_found();
        };

        tracing::debug!(
            request_id = request.request_id.as_deref().unwrap_or("unknown"),
            route = %selected.route.name,
            path_info = ?selected.path_info,
            "Route matched"
        );

        let merged = request.merged_with(selected.path_info);
        let response = self.machine.run(&merged, &selected.route.resource);

        metrics::record_dispatch(&selected.route.name, response.status.as_u16(), start);
        response
    }
}

impl Endpoint for Dispatcher {
    fn handle(&self, request: Request) -> Response {
        Dispatcher::handle(self, request)
    }
}

/// Sends every request to one resource, skipping routing.
#[derive(Clone)]
pub struct RawDispatcher {
    resource: Arc<Resource>,
    machine: Arc<dyn StateMachine>,
}

impl RawDispatcher {
    pub fn new(resource: Arc<Resource>, machine: impl StateMachine + 'static) -> Self {
        Self {
            resource,
            machine: Arc::new(machine),
        }
    }

    pub fn handle(&self, request: Request) -> Response {
        self.machine.run(&request, &self.resource)
    }
}

impl Endpoint for RawDispatcher {
    fn handle(&self, request: Request) -> Response {
        RawDispatcher::handle(self, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::machine::BasicMachine;
    use crate::http::Body;
    use crate::resource::{halt_resource, make_resource, Output, Responder, ResponseMap};
    use axum::http::StatusCode;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn echo_id() -> Resource {
        make_resource(
            ResponseMap::new().with(
                "text/plain",
                Responder::handler(|req| Output::Body(format!("id={}", req.param("id").unwrap_or("-")).into())),
            ),
            BTreeMap::new(),
        )
    }

    fn table() -> RouteTable {
        RouteTable::builder()
            .route("/todos/:id", echo_id())
            .route("/forbidden", halt_resource(StatusCode::FORBIDDEN))
            .build()
            .unwrap()
    }

    #[test]
    fn test_handle_routes_with_path_info() {
        let dispatcher = Dispatcher::new(SharedRoutes::new(table()), BasicMachine);
        let response = dispatcher.handle(Request::get("/todos/42"));
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, Body::Text("id=42".into()));
    }

    #[test]
    fn test_handle_not_found() {
        let dispatcher = Dispatcher::new(SharedRoutes::new(table()), BasicMachine);
        assert_eq!(dispatcher.handle(Request::get("/nope")), Response::not_found());

        let empty = Dispatcher::new(SharedRoutes::new(RouteTable::default()), BasicMachine);
        assert_eq!(empty.handle(Request::get("/")), Response::not_found());
    }

    #[test]
    fn test_not_found_skips_machine() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = calls.clone();
        let machine = move |_: &Request, _: &Resource| {
            counted.fetch_add(1, Ordering::SeqCst);
            Response::new(StatusCode::OK)
        };
        let dispatcher = Dispatcher::new(SharedRoutes::new(table()), machine);

        dispatcher.handle(Request::get("/nope"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        dispatcher.handle(Request::get("/forbidden"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_machine_response_passed_through() {
        let machine = |_: &Request, _: &Resource| {
            Response::new(StatusCode::IM_A_TEAPOT).with_body("short and stout")
        };
        let dispatcher = Dispatcher::new(SharedRoutes::new(table()), machine);
        let response = dispatcher.handle(Request::get("/todos/1"));
        assert_eq!(
            response,
            Response::new(StatusCode::IM_A_TEAPOT).with_body("short and stout")
        );
    }

    #[test]
    fn test_handle_is_idempotent() {
        let dispatcher = Dispatcher::new(SharedRoutes::new(table()), BasicMachine);
        let request = Request::get("/todos/7");
        assert_eq!(dispatcher.handle(request.clone()), dispatcher.handle(request));
    }

    #[test]
    fn test_replace_swaps_table() {
        let routes = SharedRoutes::new(RouteTable::default());
        let dispatcher = Dispatcher::new(routes.clone(), BasicMachine);
        assert_eq!(dispatcher.handle(Request::get("/todos/1")).status, StatusCode::NOT_FOUND);

        routes.replace(table());
        assert_eq!(dispatcher.handle(Request::get("/todos/1")).status, StatusCode::OK);
    }

    #[test]
    fn test_provider_function_source() {
        let fixed = Arc::new(table());
        let dispatcher = Dispatcher::new(move || fixed.clone(), BasicMachine);
        assert_eq!(dispatcher.handle(Request::get("/forbidden")).status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_raw_dispatcher_ignores_path() {
        let raw = RawDispatcher::new(Arc::new(halt_resource(StatusCode::ACCEPTED)), BasicMachine);
        for path in ["/", "/anything/at/all"] {
            assert_eq!(raw.handle(Request::get(path)), Response::new(StatusCode::ACCEPTED));
        }
    }
}
