use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::service::state::{HealthReport, ServiceState};

/// Raw text question in, raw text answer out
pub const QUERY_PATH: &str = "/rag_chain";

/// JSON envelope variant of the query route
pub const INVOKE_PATH: &str = "/rag_chain/invoke";

/// Liveness/readiness probe
pub const HEALTH_PATH: &str = "/health";

/// JSON query body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeRequest {
    pub input: String,
}

/// JSON answer body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeResponse {
    pub output: String,
}

/// Build the service router. Only the query and probe routes exist.
pub fn router(state: Arc<ServiceState>) -> Router {
    Router::new()
        .route(QUERY_PATH, post(query_text))
        .route(INVOKE_PATH, post(query_json))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
}

async fn query_text(State(state): State<Arc<ServiceState>>, question: String) -> impl IntoResponse {
    let answer = state.invoke(&question).await;
    (StatusCode::OK, answer)
}

async fn query_json(
    State(state): State<Arc<ServiceState>>,
    Json(request): Json<InvokeRequest>,
) -> Json<InvokeResponse> {
    let output = state.invoke(&request.input).await;
    Json(InvokeResponse { output })
}

async fn health(State(state): State<Arc<ServiceState>>) -> Json<HealthReport> {
    Json(state.health().await)
}

/// Bind and serve until Ctrl-C
pub async fn serve(addr: SocketAddr, state: Arc<ServiceState>) -> anyhow::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    info!("Query endpoint: POST http://{}{}", addr, QUERY_PATH);
    info!("Health check: GET http://{}{}", addr, HEALTH_PATH);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
