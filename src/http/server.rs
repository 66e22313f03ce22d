//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS, panics, outcome recording)
//! - Bind server to listener
//! - Drain in-flight requests on shutdown

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{CorsConfig, GatewayConfig};
use crate::http::handlers::{index, lecturers, programs, search, statistics, students, universities};
use crate::http::middleware::{panic_response, record_outcome};
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::upstream::{ClientBuildError, HttpRegistryClient, RegistryClient, UpstreamPool};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: UpstreamPool,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    upstream: UpstreamPool,
}

impl HttpServer {
    /// Create a server talking to the registry over HTTP.
    pub fn new(config: GatewayConfig) -> Result<Self, ClientBuildError> {
        let client = HttpRegistryClient::new(&config.upstream)?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Create a server over any registry client.
    pub fn with_client(config: GatewayConfig, client: Arc<dyn RegistryClient>) -> Self {
        let upstream = UpstreamPool::new(
            client,
            config.upstream.max_sessions,
            Duration::from_secs(config.upstream.timeout_secs),
        );
        let state = AppState {
            upstream: upstream.clone(),
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            upstream,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let api = Router::new()
            .route("/", get(index::api_map))
            .route("/api/v1/universities/search", get(universities::search))
            .route("/api/v1/universities/{id}", get(universities::detail))
            .route("/api/v1/universities/{id}/programs", get(universities::programs))
            .route("/api/v1/universities/{id}/logo", get(universities::logo))
            .route("/api/v1/universities/{id}/stats", get(universities::stats))
            .route("/api/v1/students/search", get(students::search))
            .route("/api/v1/students/{id}", get(students::detail))
            .route("/api/v1/lecturers/search", get(lecturers::search))
            .route("/api/v1/lecturers/{id}", get(lecturers::profile))
            .route("/api/v1/lecturers/{id}/research", get(lecturers::research))
            .route("/api/v1/programs/search", get(programs::search))
            .route("/api/v1/programs/{id}", get(programs::detail))
            .route("/api/v1/search", get(search::search_all))
            .route("/api/v1/statistics/counts", get(statistics::counts))
            .route("/api/v1/statistics/visualizations", get(statistics::visualizations))
            .fallback(index::not_found)
            .method_not_allowed_fallback(index::method_not_allowed)
            .layer(middleware::from_fn(record_outcome))
            .with_state(state);

        api.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                }))
                .layer(cors_layer(&config.cors))
                .layer(CatchPanicLayer::custom(panic_response)),
        )
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        self.upstream.close();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Any origin unless an allow-list is configured.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if config.allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
