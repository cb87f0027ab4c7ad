//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router: relay mounts, diagnostics, static site
//! - Wire up middleware (request id, tracing, timeout)
//! - Buffer inbound bodies up to the configured limit
//! - Keep the request timeout off the relay mounts; upstream calls are
//!   bounded by `upstream.timeout_secs` so failures keep the relay's shape
//! - Hand requests to the shared relay through `AxumAdapter`
//! - Serve with graceful shutdown

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, FromRequest, State},
    http::{Method, Request, StatusCode},
    response::Response,
    routing::any,
    Router,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::schema::DIAGNOSTICS_PATH;
use crate::config::RelayConfig;
use crate::diagnostics::DiagnosticsReport;
use crate::http::request::{request_id_of, MakeRequestUuidV4};
use crate::lifecycle::wait_for_signal;
use crate::observability::metrics;
use crate::relay::{serve, AxumAdapter, HostAdapter, Relay, RelayError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    pub adapter: Arc<AxumAdapter>,
    pub config: Arc<RelayConfig>,
}

/// Long-running relay server.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a server whose relay reads the credential from the environment.
    pub fn new(config: RelayConfig) -> Result<Self, reqwest::Error> {
        let relay = Relay::from_config(&config)?;
        Ok(Self::with_relay(config, relay))
    }

    /// Create a server around an already-built relay.
    pub fn with_relay(config: RelayConfig, relay: Relay) -> Self {
        let state = AppState {
            relay: Arc::new(relay),
            adapter: Arc::new(AxumAdapter::new(config.relay.mount_paths.clone())),
            config: Arc::new(config.clone()),
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let mut relay_routes = Router::new();
        for mount in &config.relay.mount_paths {
            let mount = mount.trim_end_matches('/');
            relay_routes = relay_routes
                .route(mount, any(relay_handler))
                .route(&format!("{}/", mount), any(relay_handler))
                .route(&format!("{}/{{*path}}", mount), any(relay_handler));
        }
        let relay_routes =
            relay_routes.layer(DefaultBodyLimit::max(config.security.max_body_size));

        let mut local_routes = Router::new().route(DIAGNOSTICS_PATH, any(diagnostics_handler));
        if config.static_files.enabled {
            let dir = Path::new(&config.static_files.dir);
            local_routes = local_routes.fallback_service(
                ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
            );
        }
        let local_routes = local_routes.layer(TimeoutLayer::new(Duration::from_secs(
            config.timeouts.request_secs,
        )));

        relay_routes
            .merge(local_routes)
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id_of(request.headers()),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// Run the server until Ctrl+C or `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mounts = ?self.config.relay.mount_paths,
            upstream = %self.config.upstream.base_url,
            static_files = self.config.static_files.enabled,
            "HTTP server starting"
        );
        tracing::warn!(
            "Relay does not authenticate callers; restrict access at the network layer"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The assembled router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Buffer the body and pass the request through the relay.
///
/// Preflights are answered without reading the body.
async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    if parts.method == Method::OPTIONS {
        return serve(&state.relay, state.adapter.as_ref(), Request::from_parts(parts, Bytes::new()))
            .await;
    }

    let bytes = match Bytes::from_request(Request::from_parts(parts.clone(), body), &state).await {
        Ok(bytes) => bytes,
        Err(rejection) => {
            tracing::warn!(
                request_id = %request_id_of(&parts.headers),
                error = %rejection,
                "Failed to read request body"
            );
            let error = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                RelayError::BodyTooLarge(state.config.security.max_body_size)
            } else {
                RelayError::InvalidBody(rejection.body_text())
            };
            metrics::record_rejection(error.kind());
            return state.adapter.outbound(error.into_response());
        }
    };

    serve(&state.relay, state.adapter.as_ref(), Request::from_parts(parts, bytes)).await
}

async fn diagnostics_handler(State(state): State<AppState>) -> Response {
    let report = DiagnosticsReport::collect(&state.config, state.relay.credentials());
    state.adapter.outbound(report.into_response())
}
