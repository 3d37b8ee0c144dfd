use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Directory holding the versioned model and encoder artifacts.
    pub model_dir: String,
    /// Optional Postgres URL; when absent, prediction persistence is disabled.
    pub database_url: Option<String>,
    /// JSON-lines file every accepted submission is appended to.
    pub submission_log_path: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            model_dir: std::env::var("MODEL_DIR")
                .unwrap_or_else(|_| "models".to_string())
                .trim()
                .to_string(),
            database_url: std::env::var("DB_URL")
                .or_else(|_| std::env::var("DATABASE_URL"))
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|url| {
                    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                        anyhow::bail!("DB_URL must start with postgresql:// or postgres://");
                    }
                    Ok(url)
                })
                .transpose()?,
            submission_log_path: std::env::var("SUBMISSION_LOG")
                .unwrap_or_else(|_| "user_data.txt".to_string()),
        };

        if config.model_dir.is_empty() {
            anyhow::bail!("MODEL_DIR cannot be empty");
        }

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Model artifact directory: {}", config.model_dir);
        if config.database_url.is_some() {
            tracing::debug!("Prediction persistence enabled");
        } else {
            tracing::warn!("No DB_URL configured, prediction persistence disabled");
        }
        tracing::debug!("Submission log: {}", config.submission_log_path);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
