//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::logic::features::EncodeError;
use crate::logic::model::InferenceError;
use crate::logic::PredictError;

pub type AppResult<T> = Result<T, AppError>;

/// One rejected request field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl From<&EncodeError> for FieldError {
    fn from(err: &EncodeError) -> Self {
        Self {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    // Body is not a JSON object
    BadRequest(String),

    // Missing, wrongly typed, out-of-range or unknown values, reported per field
    ValidationError(Vec<FieldError>),

    // Loaded artifacts disagree with the encoder
    SchemaMismatch(String),

    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, fields) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::ValidationError(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid patient data".to_string(),
                Some(fields),
            ),
            AppError::SchemaMismatch(msg) => {
                tracing::error!("Artifact schema mismatch: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Model artifacts are incompatible with the feature encoder".to_string(),
                    None,
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = match fields {
            Some(fields) => json!({
                "error": error_message,
                "status": status.as_u16(),
                "fields": fields,
            }),
            None => json!({
                "error": error_message,
                "status": status.as_u16(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::Invalid(errors) => {
                AppError::ValidationError(errors.iter().map(FieldError::from).collect())
            }
            PredictError::Inference(e @ InferenceError::FeatureCount { .. }) => {
                AppError::SchemaMismatch(e.to_string())
            }
            PredictError::Inference(e) => AppError::InternalError(e.to_string()),
        }
    }
}
