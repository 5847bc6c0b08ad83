//! Alert ingestion over HTTP.

use crate::state::SharedState;
use crate::worker;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use flipwatch_core::AlertPayload;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

/// Create the ingest router.
pub fn create_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/alerts", post(alert_handler))
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .layer(cors)
        .with_state(state)
}

/// Health check handler.
async fn health_handler() -> &'static str {
    "OK"
}

/// Pipeline counters as JSON.
async fn stats_handler(State(state): State<SharedState>) -> impl IntoResponse {
    Json(state.stats_summary())
}

/// Accept one alert and spawn its pipeline task.
///
/// Replies 202 immediately; research and delivery run in the background,
/// so ingestion latency never includes marketplace latency.
async fn alert_handler(
    State(state): State<SharedState>,
    Json(payload): Json<AlertPayload>,
) -> impl IntoResponse {
    if let Err(e) = payload.validate() {
        debug!("Rejected alert: {}", e);
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": e.to_string() })),
        );
    }

    state.stats.record_received();

    let task_state = state.clone();
    tokio::spawn(async move {
        worker::process_alert(task_state, payload).await;
    });

    (StatusCode::ACCEPTED, Json(json!({ "status": "accepted" })))
}

/// Bind the ingest server and serve it from a background task.
pub async fn start_ingest_server(
    state: SharedState,
    bind_addr: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr: std::net::SocketAddr = bind_addr.parse()?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Alert ingest listening on http://{}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Ingest server error: {}", e);
        }
    });

    Ok(())
}
