//! HTTP interface.
//!
//! - `POST /analyze`: verify one post, respond with the report and artifact path
//! - `GET /`: greeting
//! - `GET /health`: judge backend health
//!
//! Every failure responds with `{"detail": "<message>"}`.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use sponsorcheck_core::{ComplianceReport, RequestError, VerificationRequest};
use sponsorcheck_runtime::{PipelineError, VerificationPipeline};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<VerificationPipeline>,
}

/// Body of a successful `/analyze` response.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub report: ComplianceReport,
    pub pdf_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub judge: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Errors surfaced to HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Validation(#[from] RequestError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse {
            detail: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// POST /analyze
async fn analyze(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let value: serde_json::Value = serde_json::from_slice(&body).map_err(RequestError::from)?;
    let request = VerificationRequest::from_value(value).map_err(|e| {
        warn!(error = %e, "rejected analyze request");
        e
    })?;

    let outcome = state.pipeline.verify(&request).await?;

    Ok(Json(AnalyzeResponse {
        report: outcome.report,
        pdf_url: outcome.artifact.path.display().to_string(),
    }))
}

/// GET /
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Hello! sponsorcheck 서버가 정상 작동 중입니다." }))
}

/// GET /health
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let healthy = state.pipeline.judge_healthy().await;
    let (status, label) = if healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            judge: state.pipeline.judge_name().to_string(),
        }),
    )
}

/// Create the axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/analyze", post(analyze))
        .route("/health", get(health))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(bind_addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    info!(address = bind_addr, "sponsorcheck listening");
    axum::serve(listener, create_router(state)).await
}
