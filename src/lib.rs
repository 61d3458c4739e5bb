//! Cardiovascular Risk Prediction API
//!
//! Serves a trained Random Forest over HTTP. The model, the feature scaler
//! and the categorical encoding table are loaded from disk once at startup,
//! cross-checked, and then shared read-only by every request.
//!
//! # Architecture
//!
//! ```text
//! POST /predict
//!      │
//!      ▼
//! ┌──────────────┐   ┌──────────────┐   ┌─────────────┐   ┌─────────────┐
//! │ PatientData  │──▶│   Feature    │──▶│   Random    │──▶│  Explainer  │
//! │ (validated)  │   │   Encoder    │   │   Forest    │   │ + Formatter │
//! └──────────────┘   └──────┬───────┘   └──────┬──────┘   └─────────────┘
//!                           │                  │
//!                    ┌──────┴──────────────────┴──────┐
//!                    │   ArtifactSet (models/*.json)   │
//!                    └─────────────────────────────────┘
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod models;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::{AppError, AppResult};

use crate::config::Config;
use crate::logic::RiskPredictor;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<RiskPredictor>,
    pub config: Config,
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(handlers::info::index))
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allow_all_origins() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    tracing::info!("CORS restricted to {} origins", origins.len());

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
