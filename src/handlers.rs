use crate::artifacts::ModelArtifacts;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{HealthProfile, PredictionResponse};
use crate::prediction::run_prediction;
use crate::storage::{append_submission_log, PredictionStorage};
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool; `None` disables prediction persistence.
    pub db: Option<PgPool>,
    /// Application configuration.
    pub config: Config,
    /// Model and encoder artifacts. `None` when the startup load failed, in
    /// which case predictions fail fast with a model-unavailable error while
    /// the rest of the service stays up.
    pub artifacts: Option<Arc<ModelArtifacts>>,
}

/// GET /
///
/// Confirms the API is running; the frontend pings this on load.
pub async fn home() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "message": "Life Expectancy Prediction API is running."
        })),
    )
}

/// Health check endpoint.
///
/// Reports whether the model artifacts loaded; a degraded instance still
/// answers 200 so the platform keeps it alive while artifacts are fixed.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-lifespan-api",
            "version": "0.1.0",
            "model_loaded": state.artifacts.is_some(),
        })),
    )
}

/// POST /predict
///
/// The single synchronous prediction operation: encodes the submission,
/// blends model and formula, applies the age floor, and returns the
/// narrative, health scores, and recommendations.
///
/// Persistence and the submission log run on spawned tasks; their failures
/// are logged and never fail the response.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Value>,
) -> Result<Json<PredictionResponse>, AppError> {
    // Log the raw submission before anything can reject it; the log feeds
    // later chat-context retrieval and wants rejected submissions too.
    {
        let log_path = state.config.submission_log_path.clone();
        let submission = payload.clone();
        tokio::spawn(async move {
            if let Err(e) = append_submission_log(&log_path, &submission).await {
                tracing::warn!("Submission log write failed: {}", e);
            }
        });
    }

    let artifacts = state.artifacts.as_ref().ok_or(AppError::ModelUnavailable)?;

    let profile = HealthProfile::from_json(&payload)?;
    tracing::info!(
        "Prediction request: age {}, region {:?}",
        profile.age,
        profile.state
    );

    let response = run_prediction(artifacts, &profile)?;
    tracing::info!(
        "Prediction complete: {:.1} years ({} adjustments, {} recommendations)",
        response.prediction,
        response.adjustments.len(),
        response.recommendations.len()
    );

    if let Some(pool) = state.db.clone() {
        let user_email = payload
            .get("Email")
            .and_then(|v| v.as_str())
            .map(String::from);
        let profile_json = payload.clone();
        let result = response.clone();
        tokio::spawn(async move {
            let storage = PredictionStorage::new(pool);
            if let Err(e) = storage
                .save_prediction(user_email.as_deref(), &profile_json, &result)
                .await
            {
                tracing::error!("Failed to persist prediction: {}", e);
            }
        });
    }

    Ok(Json(response))
}
