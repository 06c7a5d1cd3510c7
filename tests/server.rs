//! End-to-end tests over a live HTTP listener.

use std::time::Duration;

use reqwest::StatusCode;
use resource_router::config::{ResourceConfig, RouteConfig, RouterConfig};
use resource_router::http::HttpServer;
use resource_router::{halt_resource, BasicMachine, RawDispatcher};
use std::sync::Arc;

mod common;
use common::{halt_route, start_server, start_with, static_route};

fn todo_config() -> RouterConfig {
    let mut config = RouterConfig::default();
    config.routes = vec![
        static_route(
            "todo",
            "/todos/:id",
            &[("application/json", r#"{"id":"{id}"}"#), ("text/plain", "todo {id}")],
            true,
        ),
        static_route("todo-list", "/todos", &[("text/plain", "all todos")], false),
        halt_route("admin", "/admin/*", 403),
        RouteConfig {
            name: "broken".into(),
            pattern: "/broken".into(),
            resource: ResourceConfig::Error {
                message: "database unavailable".into(),
            },
        },
    ];
    config
}

#[tokio::test]
async fn test_routes_and_path_params() {
    let server = start_server(todo_config()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(server.url("/todos/42"))
        .header("accept", "text/plain")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/plain");
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "todo 42");

    let res = client
        .get(server.url("/todos/42"))
        .header("accept", "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["content-type"], "application/json");
    assert_eq!(res.text().await.unwrap(), r#"{"id":"42"}"#);

    let res = client.get(server.url("//todos//")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), "all todos");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_unrouted_request_is_404() {
    let server = start_server(todo_config()).await;

    let res = reqwest::get(server.url("/todos/1/comments")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), "Resource not found");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_halt_and_error_resources() {
    let server = start_server(todo_config()).await;

    let res = reqwest::get(server.url("/admin/users/7")).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(res.text().await.unwrap().is_empty());

    let res = reqwest::get(server.url("/broken")).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.text().await.unwrap(), "database unavailable");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_method_not_allowed() {
    let server = start_server(todo_config()).await;

    let res = reqwest::Client::new()
        .delete(server.url("/todos/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers()["allow"], "GET, HEAD");

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let mut config = todo_config();
    config.listener.max_body_bytes = 8;
    let server = start_server(config).await;

    let res = reqwest::Client::new()
        .get(server.url("/todos/1"))
        .body("this body is far too large")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_route_reload_over_channel() {
    let server = start_server(todo_config()).await;

    let res = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let mut updated = todo_config();
    updated.routes.insert(0, halt_route("health", "/health", 204));
    server.config_tx.send(updated).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let res = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_raw_endpoint_skips_routing() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let raw = RawDispatcher::new(
        Arc::new(halt_resource(axum::http::StatusCode::ACCEPTED)),
        BasicMachine,
    );
    let server = start_with(
        HttpServer::with_endpoint(RouterConfig::default(), raw),
        listener,
    )
    .await;

    for path in ["/", "/any/path/at/all"] {
        let res = reqwest::get(server.url(path)).await.unwrap();
        assert_eq!(res.status(), StatusCode::ACCEPTED);
    }

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown() {
    let server = start_server(todo_config()).await;
    server.shutdown.trigger();

    let result = tokio::time::timeout(Duration::from_secs(5), server.handle)
        .await
        .expect("server did not stop");
    assert!(result.unwrap().is_ok());
}
