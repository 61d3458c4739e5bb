//! Response Formatter
//!
//! Stateless mapping from a prediction to the response body. Interval bounds
//! are rounded like the probabilities so identical inputs serialize to
//! identical bytes.

use crate::constants::DISCLAIMER;
use crate::logic::explain::RiskFactor;
use crate::logic::model::{round_probability, PredictionResult};
use crate::models::{FactorNote, PredictionResponse};

pub fn format(
    result: &PredictionResult,
    factors: &[RiskFactor],
    recommendations: Vec<String>,
) -> PredictionResponse {
    let [lo, hi] = result.confidence_interval;

    PredictionResponse {
        risk_label: result.risk_level.label().to_string(),
        risk_probability: round_probability(result.probability),
        model_probability: round_probability(result.model_probability),
        at_risk: result.at_risk,
        confidence_interval: [round_probability(lo), round_probability(hi)],
        risk_factors: factors
            .iter()
            .map(|f| FactorNote {
                factor: f.factor.clone(),
                detail: f.detail.clone(),
            })
            .collect(),
        recommendations,
        disclaimer: DISCLAIMER.to_string(),
    }
}
