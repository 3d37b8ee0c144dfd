mod artifacts;
mod baselines;
mod config;
mod db;
mod encoder;
mod errors;
mod formula;
mod handlers;
mod models;
mod narrative;
mod prediction;
mod recommendations;
mod scores;
mod storage;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::artifacts::ModelArtifacts;
use crate::config::Config;
use crate::db::Database;

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - Model and encoder artifact loading (degraded-but-live on failure).
/// - Optional database connection for prediction persistence.
/// - HTTP routes and middleware (CORS, Rate Limiting).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_lifespan_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // Load model artifacts. A failed load is a degraded-but-live state, not
    // a crash: predictions fail fast until the artifacts are fixed.
    let artifacts = match ModelArtifacts::load(&config.model_dir) {
        Ok(loaded) => {
            tracing::info!("✓ Model artifacts loaded from {}", config.model_dir);
            Some(Arc::new(loaded))
        }
        Err(e) => {
            tracing::error!(
                "Failed to load model artifacts from {}: {:#}",
                config.model_dir,
                e
            );
            None
        }
    };

    // Connect to the database when configured; persistence is best-effort
    // and the service runs without it.
    let db = match config.database_url.as_deref() {
        Some(url) => match Database::new(url).await {
            Ok(database) => {
                tracing::info!("Database connection pool established");
                Some(database.pool)
            }
            Err(e) => {
                tracing::error!("Failed to connect to database: {:#}", e);
                None
            }
        },
        None => None,
    };

    // Build application state
    let app_state = Arc::new(crate::handlers::AppState {
        db,
        config: config.clone(),
        artifacts,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route("/", get(handlers::home))
        .route("/predict", post(handlers::predict))
        .layer(
            ServiceBuilder::new()
                // Request size limit: 1MB max payload (a profile is tiny)
                .layer(RequestBodyLimitLayer::new(1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        // Permissive CORS so the browser frontend can call from another origin
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
