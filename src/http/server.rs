//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum router with all API routes
//! - Wire up middleware (CORS, timeout, tracing, request ID, metrics)
//! - Build the upstream client and token cache from config
//! - Static-asset fallback for non-API paths
//! - Bind the server to a listener with graceful shutdown

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;
use uuid::Uuid;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::http::handlers;
use crate::observability::metrics;
use crate::token::{HttpTokenExchanger, SystemClock, TokenCache};
use crate::upstream::CatalogClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenCache>,
    pub catalog: Arc<CatalogClient>,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Build the server and all its subsystems from a validated config.
    pub fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream.request_timeout_secs))
            .build()
            .map_err(|e| RelayError::Internal(format!("failed to build HTTP client: {e}")))?;

        let token_url = parse_url(&config.upstream.token_url)?;
        let base_url = parse_url(&config.upstream.api_base_url)?;

        let exchanger = Arc::new(HttpTokenExchanger::new(http.clone(), token_url));
        let tokens = Arc::new(TokenCache::new(
            config.credentials.clone(),
            config.token.safety_margin_secs,
            exchanger,
            Arc::new(SystemClock),
        ));
        let catalog = Arc::new(CatalogClient::new(http, base_url, tokens.clone()));

        let state = AppState { tokens, catalog };
        let router = Self::build_router(&config, state);

        Ok(Self { router, config })
    }

    /// Build the axum router with all routes and middleware layers.
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        // Public read-only relay with no cookie session: accept any origin.
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

        let mut router = Router::new()
            .route("/api/token", post(handlers::issue_token))
            .route("/api/tracks/{id}", get(handlers::get_track))
            .route("/api/tracks", get(handlers::get_tracks_batch))
            .route("/api/artists/{id}", get(handlers::get_artist))
            .route("/api/artists", get(handlers::get_artists_batch))
            .route("/api/audio-features/{id}", get(handlers::get_audio_features))
            .route("/api/audio-features", get(handlers::get_audio_features_batch))
            .with_state(state);

        // SPA fallback: non-API paths serve the built frontend bundle.
        if config.assets.enabled {
            router = router.fallback_service(
                ServeDir::new(&config.assets.dir).append_index_html_on_directories(true),
            );
        }

        router
            .layer(middleware::from_fn(track_request))
            .layer(cors)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.listener.request_timeout_secs),
            ))
            .layer(middleware::from_fn(request_id))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }
}

/// Ensure an x-request-id is present on the request and echoed on the
/// response, for log correlation.
async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    if let Ok(value) = HeaderValue::from_str(&id) {
        req.headers_mut().insert("x-request-id", value);
    }

    let mut response = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert("x-request-id", value);
    }

    response
}

/// Record request counters and latency.
async fn track_request(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    metrics::record_request(&method, &path, response.status().as_u16(), start);
    response
}

fn parse_url(raw: &str) -> Result<Url, RelayError> {
    Url::parse(raw).map_err(|e| RelayError::Internal(format!("bad upstream URL {raw}: {e}")))
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
