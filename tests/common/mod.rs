//! Shared utilities for integration tests.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

use resource_router::config::{ResourceConfig, RouteConfig, RouterConfig};
use resource_router::http::HttpServer;
use resource_router::lifecycle::Shutdown;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// A running server plus the handles to drive it.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_tx: mpsc::UnboundedSender<RouterConfig>,
    pub handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start `config` on an ephemeral loopback port.
pub async fn start_server(mut config: RouterConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let server = HttpServer::new(config).unwrap();
    start_with(server, listener).await
}

/// Start an already-built server on `listener`.
pub async fn start_with(server: HttpServer, listener: TcpListener) -> TestServer {
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let (config_tx, config_rx) = mpsc::unbounded_channel();
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(async move { server.run(listener, config_rx, server_shutdown).await });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        shutdown,
        config_tx,
        handle,
    }
}

#[allow(dead_code)]
pub fn static_route(name: &str, pattern: &str, responses: &[(&str, &str)], template: bool) -> RouteConfig {
    RouteConfig {
        name: name.into(),
        pattern: pattern.into(),
        resource: ResourceConfig::Static {
            responses: responses
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            allowed_methods: None,
            template,
        },
    }
}

#[allow(dead_code)]
pub fn halt_route(name: &str, pattern: &str, status: u16) -> RouteConfig {
    RouteConfig {
        name: name.into(),
        pattern: pattern.into(),
        resource: ResourceConfig::Halt { status, body: None },
    }
}
