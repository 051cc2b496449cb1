//! Web API router construction.

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer};

use crate::state::AppState;
use crate::web::middleware::request_id::RequestIdLayer;
use crate::web::{ask, status, transcribe};

/// Uploaded audio cap. Browser recordings of a spoken question stay far
/// below this; anything bigger is a client bug.
const MAX_AUDIO_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Creates the web server router
pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        .route("/health", get(status::health))
        .route("/status", get(status::status))
        .route("/ask", post(ask::ask))
        .route(
            "/transcribe",
            post(transcribe::transcribe).layer(DefaultBodyLimit::max(MAX_AUDIO_UPLOAD_BYTES)),
        )
        .with_state(app_state.clone());

    let router = Router::new().nest("/api", api_router).with_state(app_state);

    router.layer((
        // Outermost: per-request ID span + severity-proportional response logging.
        RequestIdLayer,
        CorsLayer::permissive(),
        // Compress API responses (gzip/brotli/zstd).
        CompressionLayer::new()
            .zstd(true)
            .br(true)
            .gzip(true)
            .quality(tower_http::CompressionLevel::Fastest),
        TimeoutLayer::new(Duration::from_secs(120)),
    ))
}
