use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use promptlab_core::engine::runner::Runner;
use promptlab_core::model::PromptRunReport;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub runner: Arc<Runner>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing 'userPrompt' in request body")]
    MissingPrompt,
    #[error("Failed to run the single prompt experiment")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingPrompt => StatusCode::BAD_REQUEST,
            ApiError::Internal(e) => {
                // Full cause stays server-side; the client gets a generic message.
                tracing::error!(event = "run_one_prompt_failed", error = %e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOnePromptRequest {
    #[serde(default)]
    pub user_prompt: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/experiment/runOnePrompt", post(run_one_prompt))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK" }))
}

async fn run_one_prompt(
    State(state): State<AppState>,
    Json(req): Json<RunOnePromptRequest>,
) -> Result<Json<PromptRunReport>, ApiError> {
    let prompt = match req.user_prompt.as_deref() {
        Some(p) if !p.is_empty() => p,
        _ => return Err(ApiError::MissingPrompt),
    };

    tracing::info!(event = "run_one_prompt", prompt_len = prompt.len());
    let report = state.runner.run_one_prompt(prompt).await?;
    tracing::info!(
        event = "run_one_prompt_done",
        experiment_run_id = report.experiment_run_id,
        aggregate_score = report.aggregate_score,
    );
    Ok(Json(report))
}
