//! Cardiovascular Risk Prediction API server

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cardio_risk_api::config::Config;
use cardio_risk_api::constants::{APP_NAME, APP_VERSION};
use cardio_risk_api::logic::{ArtifactSet, RiskPredictor};
use cardio_risk_api::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env();

    // Initialize logging, JSON lines in production
    let json_logs = config.is_production();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "cardio_risk_api=debug,tower_http=debug".into()))
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("{} v{} starting...", APP_NAME, APP_VERSION);
    tracing::info!("Environment: {}", config.environment);

    // Artifacts are required; refuse to start without them
    let artifacts = ArtifactSet::load(&config.models_dir).with_context(|| {
        format!("failed to load model artifacts from {}", config.models_dir.display())
    })?;

    tracing::info!(
        "Clinical adjustment {}",
        if config.clinical_adjustment { "enabled" } else { "disabled" }
    );

    // Build application state
    let state = AppState {
        predictor: Arc::new(RiskPredictor::new(artifacts, config.clinical_adjustment)),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
