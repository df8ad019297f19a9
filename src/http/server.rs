//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the relay route
//! - Wire up middleware (CORS, request ID, tracing, body limit)
//! - Bind the router to a listener and serve until shutdown

use std::io;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::{header::InvalidHeaderValue, Request, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::http::cors::build_cors_layer;
use crate::relay::{Relay, RelayError, RelayResult, Upload, UploadError, UpstreamClient};

/// Path the relay listens on.
pub const PROXY_ROUTE: &str = "/proxy/img";

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Error type for server construction.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error("invalid CORS origin: {0}")]
    Cors(#[from] InvalidHeaderValue),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
}

/// HTTP server for the image relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RelayConfig) -> Result<Self, ServerError> {
        let upstream = UpstreamClient::from_config(&config.upstream)?;
        let state = AppState {
            relay: Arc::new(Relay::new(upstream)),
        };

        let router = build_router(&config, state)?;
        Ok(Self { router, config })
    }

    /// The fully layered router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.url,
            "HTTP server starting"
        );

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

/// Build the Axum router with all middleware layers.
pub fn build_router(config: &RelayConfig, state: AppState) -> Result<Router, ServerError> {
    let cors = build_cors_layer(&config.cors)?;
    let body_limit = match config.limits.max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    let router = Router::new()
        .route(PROXY_ROUTE, post(proxy_upload))
        .fallback(not_found)
        .layer(body_limit)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors),
        );

    Ok(router)
}

/// `POST /proxy/img`: relay the `file` field upstream.
async fn proxy_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<RelayResult, UploadError> {
    let upload = Upload::from_multipart(multipart?).await?;
    Ok(state.relay.handle_proxy_upload(upload).await)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}
