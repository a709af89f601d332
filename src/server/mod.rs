//! HTTP surface
//!
//! - `GET /` reports service and model status
//! - `POST /process_audio` runs an uploaded WAV through the pipeline
//! - `POST /deep_dream` waveshapes a JSON sample array
//!
//! Any origin may call the API.

pub mod handlers;
pub mod response;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::Result;
use crate::neural::PareidoliaEngine;
use crate::pipeline::TransformPipeline;

pub use response::{DeepDreamResponse, ModelStatus, ProcessAudioResponse, StatusResponse};

/// Upload size cap: 50 MiB
pub const DEFAULT_BODY_LIMIT: usize = 50 * 1024 * 1024;

/// State shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TransformPipeline>,
}

impl AppState {
    pub fn new(engine: Arc<PareidoliaEngine>) -> Self {
        Self {
            pipeline: Arc::new(TransformPipeline::new(engine)),
        }
    }
}

/// Build the application router
pub fn app_router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/", get(handlers::status))
        .route("/process_audio", post(handlers::process_audio))
        .route("/deep_dream", post(handlers::deep_dream))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(addr: SocketAddr, state: AppState, body_limit: usize) -> Result<()> {
    let app = app_router(state, body_limit);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server ready on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
