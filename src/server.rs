use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Extension, Router,
};
use hyper::Server;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::error::{KpiError, Result};
use crate::metrics::ApiMetrics;
use crate::service::{ApiResponse, KpiService};

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "core-kpi",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Run a blocking store read off the async workers and shape the reply.
async fn run_read<F>(service: KpiService, endpoint: &'static str, read: F) -> Response
where
    F: FnOnce(&KpiService) -> ApiResponse + Send + 'static,
{
    info!(endpoint, "Request received");
    let response = match tokio::task::spawn_blocking(move || read(&service)).await {
        Ok(response) => response,
        Err(e) => {
            error!(endpoint, "read task failed: {}", e);
            ApiResponse::Error {
                error: format!("Failed to fetch {} KPI data", endpoint),
            }
        }
    };
    ApiMetrics::record_request(endpoint, !response.is_error());
    let status = if response.is_error() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };
    (status, Json(response)).into_response()
}

async fn summary(Extension(service): Extension<KpiService>) -> Response {
    run_read(service, "summary", |s| s.summary_response()).await
}

async fn mobility(Extension(service): Extension<KpiService>) -> Response {
    run_read(service, "mobility", |s| s.mobility_response()).await
}

async fn session(Extension(service): Extension<KpiService>) -> Response {
    run_read(service, "session", |s| s.session_response()).await
}

async fn slices(Extension(service): Extension<KpiService>) -> Response {
    run_read(service, "slices", |s| s.slices_response()).await
}

async fn slice_shares(Extension(service): Extension<KpiService>) -> Response {
    run_read(service, "slice_shares", |s| s.slice_shares_response()).await
}

/// Create the HTTP router with all read endpoints.
pub fn create_server(service: KpiService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/summary", get(summary))
        .route("/mobility", get(mobility))
        .route("/amf", get(mobility))
        .route("/session", get(session))
        .route("/smf", get(session))
        .route("/slices", get(slices))
        .route("/snssai", get(slices))
        .route("/slices/shares", get(slice_shares))
        .layer(Extension(service))
        .layer(ServiceBuilder::new().layer(cors))
}

/// Serve the read API on `port` until Ctrl-C.
pub async fn start_server(service: KpiService, port: u16) -> Result<()> {
    let app = create_server(service);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("KPI API listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    Server::try_bind(&addr)
        .map_err(|e| KpiError::Server(format!("failed to bind {}: {}", addr, e)))?
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await
        .map_err(|e| KpiError::Server(e.to_string()))?;

    Ok(())
}
