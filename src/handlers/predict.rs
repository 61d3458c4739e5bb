//! Prediction handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;

use crate::models::PredictionResponse;
use crate::{AppError, AppResult, AppState};

/// Score one patient.
///
/// The body is taken as a JSON value so that missing and wrongly typed
/// fields are reported per field, alongside range and category problems.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(body) = payload?;
    let Value::Object(body) = body else {
        return Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    };

    let response = state.predictor.predict_body(&body).map_err(|e| {
        tracing::debug!("Prediction rejected: {}", e);
        e
    })?;

    tracing::info!(
        "Prediction: {} (p = {:.4}, model = {:.4})",
        response.risk_label,
        response.risk_probability,
        response.model_probability
    );

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatientData;
    use crate::testing::sample_state;

    fn reference_body() -> Value {
        serde_json::to_value(PatientData::reference()).unwrap()
    }

    #[test]
    fn test_predict_reference_patient() {
        let Json(response) =
            tokio_test::block_on(predict(State(sample_state()), Ok(Json(reference_body()))))
                .unwrap();

        assert!((0.0..=1.0).contains(&response.risk_probability));
        assert_eq!(response.model_probability, 0.42);
        assert!(!response.recommendations.is_empty());
    }

    #[test]
    fn test_out_of_range_is_validation_error() {
        let mut body = reference_body();
        body["age"] = serde_json::json!(130);

        let result = tokio_test::block_on(predict(State(sample_state()), Ok(Json(body))));
        match result {
            Err(AppError::ValidationError(fields)) => assert_eq!(fields[0].field, "age"),
            Err(other) => panic!("unexpected {other:?}"),
            Ok(_) => panic!("out-of-range age was accepted"),
        }
    }

    #[test]
    fn test_non_object_body_is_bad_request() {
        let result = tokio_test::block_on(predict(
            State(sample_state()),
            Ok(Json(serde_json::json!([55, "Male"]))),
        ));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
