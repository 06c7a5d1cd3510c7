//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a single dispatching fallback handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Convert wire requests into [`Request`] records and back
//! - Apply route table reloads while serving

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    response::{IntoResponse, Response as AxumResponse},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{build_route_table, ConfigError, RouterConfig};
use crate::dispatch::{BasicMachine, Dispatcher, Endpoint, SharedRoutes, TableSource};
use crate::http::request::{MakeRequestUuid, Request};
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub endpoint: Arc<dyn Endpoint>,
    pub body_limit: usize,
}

/// HTTP server fronting a dispatcher.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
    routes: Option<SharedRoutes>,
}

impl HttpServer {
    /// Build the route table from `config` and serve it with [`BasicMachine`].
    pub fn new(config: RouterConfig) -> Result<Self, ConfigError> {
        let routes = SharedRoutes::new(build_route_table(&config.routes)?);
        let dispatcher = Dispatcher::new(routes.clone(), BasicMachine);

        let mut server = Self::with_endpoint(config, dispatcher);
        server.routes = Some(routes);
        Ok(server)
    }

    /// Serve `endpoint` directly. Route reloads are ignored.
    pub fn with_endpoint(config: RouterConfig, endpoint: impl Endpoint + 'static) -> Self {
        let state = AppState {
            endpoint: Arc::new(endpoint),
            body_limit: config.listener.max_body_bytes,
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            routes: None,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Handle to the live route table, when this server owns one.
    pub fn routes(&self) -> Option<&SharedRoutes> {
        self.routes.as_ref()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Serve until `shutdown` fires, applying route updates as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.routes.as_ref().map(|r| r.current().len()).unwrap_or(0),
            "HTTP server starting"
        );

        if let Some(routes) = self.routes.clone() {
            tokio::spawn(async move {
                while let Some(config) = config_updates.recv().await {
                    apply_update(&routes, &config);
                }
            });
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Rebuild the route table from `config` and swap it in.
///
/// On failure the current table stays active.
pub fn apply_update(routes: &SharedRoutes, config: &RouterConfig) {
    match build_route_table(&config.routes) {
        Ok(table) => {
            tracing::info!(routes = table.len(), "Route table reloaded");
            routes.replace(table);
            metrics::record_table_reload("applied");
        }
        Err(e) => {
            tracing::error!(error = %e, "Rejected route table update, keeping current routes");
            metrics::record_table_reload("rejected");
        }
    }
}

/// Fallback handler: every request goes through the endpoint.
async fn dispatch_handler(
    State(state): State<AppState>,
    request: axum::extract::Request,
) -> AxumResponse {
    let request = match Request::from_http(request, state.body_limit).await {
        Ok(request) => request,
        Err(status) => return status.into_response(),
    };

    tracing::debug!(
        request_id = request.request_id.as_deref().unwrap_or("unknown"),
        method = %request.method,
        path = %request.path,
        "Dispatching request"
    );

    state.endpoint.handle(request).into_response()
}
