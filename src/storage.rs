//! Best-effort persistence collaborators.
//!
//! Neither the database write nor the submission log is a hard dependency of
//! the prediction path: failures are logged and swallowed, and the prediction
//! response is returned regardless. The submission log is a JSON-lines file
//! later read back as chat context by the assistant frontend.

use crate::errors::AppError;
use crate::models::PredictionResponse;
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

/// Database storage service for prediction results.
pub struct PredictionStorage {
    pool: PgPool,
}

impl PredictionStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists one prediction with its submitted profile.
    ///
    /// `user_email` is whatever the submission carried in its optional
    /// "Email" field; anonymous submissions are stored without it.
    pub async fn save_prediction(
        &self,
        user_email: Option<&str>,
        profile: &Value,
        result: &PredictionResponse,
    ) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        let result_json = serde_json::to_value(result)
            .map_err(|e| AppError::InternalError(format!("Failed to serialize result: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO predictions (id, user_email, profile, result, prediction, created_at)
            VALUES ($1, $2, $3, $4, $5, now())
            "#,
        )
        .bind(id)
        .bind(user_email)
        .bind(profile)
        .bind(&result_json)
        .bind(result.prediction)
        .execute(&self.pool)
        .await?;

        tracing::info!("Stored prediction {} ({:.1} years)", id, result.prediction);
        Ok(id)
    }
}

/// Appends one submission to the JSON-lines log, stamped with receipt time.
pub async fn append_submission_log(path: &str, submission: &Value) -> Result<(), AppError> {
    use tokio::io::AsyncWriteExt;

    let entry = json!({
        "timestamp": Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        "data": submission,
    });
    let mut line = entry.to_string();
    line.push('\n');

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to open submission log: {}", e)))?;

    file.write_all(line.as_bytes())
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to write submission log: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn submission_log_appends_json_lines() {
        let dir = std::env::temp_dir().join(format!("lifespan-log-{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("user_data.txt");
        let path_str = path.to_str().unwrap();

        append_submission_log(path_str, &json!({"Age": 35}))
            .await
            .unwrap();
        append_submission_log(path_str, &json!({"Age": 55}))
            .await
            .unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["data"]["Age"], 35);
        assert!(first["timestamp"].is_string());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn submission_log_failure_is_reported_not_panicked() {
        let err = append_submission_log("/nonexistent-dir/user_data.txt", &json!({"Age": 1}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
    }
}
