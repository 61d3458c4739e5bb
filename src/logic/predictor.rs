//! Risk Predictor - request pipeline
//!
//! PatientData -> encoder -> forest -> clinical adjustment -> explainer ->
//! formatter. Holds the loaded artifacts; never mutates them.

use serde_json::{Map, Value};
use thiserror::Error;

use super::artifacts::ArtifactSet;
use super::explain;
use super::features::{EncodeError, Field};
use super::formatter;
use super::model::{self, adjustment, InferenceError, RiskThresholds};
use crate::models::{PatientData, PredictionResponse};

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid patient data ({} field errors)", .0.len())]
    Invalid(Vec<EncodeError>),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

#[derive(Debug)]
pub struct RiskPredictor {
    artifacts: ArtifactSet,
    thresholds: RiskThresholds,
    clinical_adjustment: bool,
}

impl RiskPredictor {
    pub fn new(artifacts: ArtifactSet, clinical_adjustment: bool) -> Self {
        Self {
            artifacts,
            thresholds: RiskThresholds::default(),
            clinical_adjustment,
        }
    }

    pub fn artifacts(&self) -> &ArtifactSet {
        &self.artifacts
    }

    pub fn clinical_adjustment(&self) -> bool {
        self.clinical_adjustment
    }

    /// Score a raw JSON object. Decode failures are reported together with
    /// the range and category problems of the fields that did decode.
    pub fn predict_body(
        &self,
        body: &Map<String, Value>,
    ) -> Result<PredictionResponse, PredictError> {
        let failure = match PatientData::from_json(body) {
            Ok(patient) => return self.predict(&patient),
            Err(failure) => failure,
        };

        let undecoded: Vec<&'static str> = failure.errors.iter().map(|e| e.field()).collect();
        let mut errors = failure.errors;
        errors.extend(
            self.artifacts
                .encoder()
                .violations(&failure.partial)
                .into_iter()
                .filter(|e| !undecoded.contains(&e.field())),
        );
        errors.sort_by_key(|e| Field::position(e.field()));

        Err(PredictError::Invalid(errors))
    }

    pub fn predict(&self, patient: &PatientData) -> Result<PredictionResponse, PredictError> {
        let encoder = self.artifacts.encoder();
        let vector = encoder
            .encode(patient)
            .map_err(|_| PredictError::Invalid(encoder.violations(patient)))?;

        tracing::debug!("Encoded features: {}", vector.to_log_entry(encoder.plan().names()));

        let mut result = model::predict(&vector, self.artifacts.model(), &self.thresholds)?;

        if self.clinical_adjustment {
            let adjusted = adjustment::adjust(patient, result.model_probability);
            result = result.with_probability(adjusted, &self.thresholds);
        }

        let factors = explain::risk_factors(patient);
        let recommendations =
            explain::recommendations(result.risk_level, result.probability, &factors);

        Ok(formatter::format(&result, &factors, recommendations))
    }
}
