//! Health check handler

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::logic::artifacts::ArtifactStatus;
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub models_loaded: bool,
    pub artifacts: ArtifactStatus,
    pub version: String,
    pub timestamp: String,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.predictor.artifacts().status();
    let loaded = status.all_loaded();

    Json(HealthResponse {
        status: if loaded { "healthy" } else { "degraded" }.to_string(),
        models_loaded: loaded,
        artifacts: status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
