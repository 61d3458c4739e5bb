//! Prediction response model

use serde::{Deserialize, Serialize};

/// Response body of `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Low Risk, Moderate Risk or High Risk
    pub risk_label: String,

    /// Probability the label is derived from, 4 decimals
    pub risk_probability: f64,

    /// Raw forest probability, 4 decimals
    pub model_probability: f64,

    /// Positive class at the 0.5 cut point
    pub at_risk: bool,

    /// 95% interval around `risk_probability`
    pub confidence_interval: [f64; 2],

    pub risk_factors: Vec<FactorNote>,

    pub recommendations: Vec<String>,

    pub disclaimer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorNote {
    pub factor: String,
    pub detail: String,
}
