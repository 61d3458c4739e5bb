//! Inference Invoker
//!
//! Applies a frozen classifier to an encoded vector. The model sits behind
//! `RiskModel` so tests can swap in a stub with a fixed probability.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::threshold::{RiskLevel, RiskThresholds};
use crate::logic::features::EncodedFeatureVector;

/// z-score of a two-sided 95% interval
const Z_95: f64 = 1.96;

/// Interval half-width when the model exposes no per-tree spread
const FALLBACK_MARGIN: f64 = 0.1;

/// Decimal places kept in published probabilities
pub const PROBABILITY_DECIMALS: i32 = 4;

pub fn round_probability(value: f64) -> f64 {
    let factor = 10f64.powi(PROBABILITY_DECIMALS);
    (value * factor).round() / factor
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("model expects {expected} features, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("model returned probability {0} outside [0, 1]")]
    InvalidOutput(f64),
}

// ============================================================================
// MODEL TRAIT
// ============================================================================

/// Narrow capability the server needs from a trained classifier
pub trait RiskModel: Send + Sync + std::fmt::Debug {
    /// Width of the input vector
    fn n_features(&self) -> usize;

    /// Number of ensemble members
    fn n_trees(&self) -> usize;

    /// Probability of the positive class
    fn predict_proba(&self, features: &[f64]) -> Result<f64, InferenceError>;

    /// Positive-class probability of each ensemble member, if the model has any
    fn tree_probabilities(&self, _features: &[f64]) -> Option<Vec<f64>> {
        None
    }
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Raw forest probability, rounded
    pub model_probability: f64,
    /// Rounded probability the label and class are derived from
    pub probability: f64,
    /// `probability >= positive_class` threshold
    pub at_risk: bool,
    pub risk_level: RiskLevel,
    /// Population std of per-tree probabilities
    pub spread: Option<f64>,
    pub confidence_interval: [f64; 2],
}

impl PredictionResult {
    fn new(model_probability: f64, spread: Option<f64>, thresholds: &RiskThresholds) -> Self {
        // Classify the published value so the label never contradicts it
        let model_probability = round_probability(model_probability);
        Self {
            model_probability,
            probability: model_probability,
            at_risk: thresholds.is_positive(model_probability),
            risk_level: thresholds.classify(model_probability),
            spread,
            confidence_interval: confidence_interval(model_probability, spread),
        }
    }

    /// Re-derive class, label and interval around a new probability
    pub fn with_probability(self, probability: f64, thresholds: &RiskThresholds) -> Self {
        let probability = round_probability(probability);
        Self {
            probability,
            at_risk: thresholds.is_positive(probability),
            risk_level: thresholds.classify(probability),
            confidence_interval: confidence_interval(probability, self.spread),
            ..self
        }
    }
}

/// Run the model on one encoded vector
pub fn predict(
    vector: &EncodedFeatureVector,
    model: &dyn RiskModel,
    thresholds: &RiskThresholds,
) -> Result<PredictionResult, InferenceError> {
    let features = vector.as_slice();
    if features.len() != model.n_features() {
        return Err(InferenceError::FeatureCount {
            expected: model.n_features(),
            actual: features.len(),
        });
    }

    let probability = model.predict_proba(features)?;
    if !(0.0..=1.0).contains(&probability) {
        return Err(InferenceError::InvalidOutput(probability));
    }

    let spread = model
        .tree_probabilities(features)
        .filter(|p| p.len() >= 2)
        .map(|p| population_std(&p));

    Ok(PredictionResult::new(probability, spread, thresholds))
}

/// `p ± 1.96·σ` clamped to [0, 1], or `p ± 0.1` without a spread
pub fn confidence_interval(probability: f64, spread: Option<f64>) -> [f64; 2] {
    let margin = spread.map_or(FALLBACK_MARGIN, |s| Z_95 * s);
    [
        (probability - margin).max(0.0),
        (probability + margin).min(1.0),
    ]
}

fn population_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FixedProbability;

    fn vector(len: usize) -> EncodedFeatureVector {
        EncodedFeatureVector::new(0, vec![0.0; len])
    }

    #[test]
    fn test_predict_with_stub() {
        let model = FixedProbability::new(0.72);
        let result = predict(&vector(9), &model, &RiskThresholds::default()).unwrap();

        assert_eq!(result.model_probability, 0.72);
        assert!(result.at_risk);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.spread, None);
        assert!((result.confidence_interval[0] - 0.62).abs() < 1e-12);
        assert!((result.confidence_interval[1] - 0.82).abs() < 1e-12);
    }

    #[test]
    fn test_predict_is_idempotent() {
        let model = FixedProbability::new(0.31);
        let thresholds = RiskThresholds::default();
        let first = predict(&vector(9), &model, &thresholds).unwrap();
        let second = predict(&vector(9), &model, &thresholds).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_feature_count_mismatch() {
        let model = FixedProbability::new(0.5);
        let err = predict(&vector(8), &model, &RiskThresholds::default()).unwrap_err();
        assert_eq!(err, InferenceError::FeatureCount { expected: 9, actual: 8 });
    }

    #[test]
    fn test_out_of_range_output_rejected() {
        let model = FixedProbability::new(1.2);
        let err = predict(&vector(9), &model, &RiskThresholds::default()).unwrap_err();
        assert_eq!(err, InferenceError::InvalidOutput(1.2));
    }

    #[test]
    fn test_interval_from_tree_spread() {
        let model = FixedProbability {
            trees: Some(vec![0.2, 0.4]),
            ..FixedProbability::new(0.3)
        };
        let result = predict(&vector(9), &model, &RiskThresholds::default()).unwrap();

        let spread = result.spread.unwrap();
        assert!((spread - 0.1).abs() < 1e-12);
        assert!((result.confidence_interval[0] - (0.3 - 0.196)).abs() < 1e-12);
        assert!((result.confidence_interval[1] - (0.3 + 0.196)).abs() < 1e-12);
    }

    #[test]
    fn test_interval_clamped() {
        let [lo, hi] = confidence_interval(0.05, None);
        assert_eq!(lo, 0.0);
        assert!((hi - 0.15).abs() < 1e-12);
        assert_eq!(confidence_interval(0.98, Some(0.5))[1], 1.0);
    }

    #[test]
    fn test_classified_after_rounding() {
        let thresholds = RiskThresholds::default();
        for (raw, published, level) in [
            (0.49996, 0.5, RiskLevel::Moderate),
            (0.59996, 0.6, RiskLevel::High),
            (0.34996, 0.35, RiskLevel::Moderate),
            (0.34994, 0.3499, RiskLevel::Low),
        ] {
            let result = predict(&vector(9), &FixedProbability::new(raw), &thresholds).unwrap();
            assert_eq!(result.probability, published);
            assert_eq!(result.risk_level, level, "p = {}", raw);
            assert_eq!(result.at_risk, published >= 0.5);
        }
    }

    #[test]
    fn test_with_probability_rounds_before_classifying() {
        let thresholds = RiskThresholds::default();
        let result = predict(&vector(9), &FixedProbability::new(0.1), &thresholds)
            .unwrap()
            .with_probability(0.49996, &thresholds);

        assert_eq!(result.probability, 0.5);
        assert!(result.at_risk);
        assert_eq!(result.risk_level, RiskLevel::Moderate);
    }

    #[test]
    fn test_with_probability_rederives_label() {
        let model = FixedProbability::new(0.7);
        let thresholds = RiskThresholds::default();
        let result = predict(&vector(9), &model, &thresholds)
            .unwrap()
            .with_probability(0.2, &thresholds);

        assert_eq!(result.model_probability, 0.7);
        assert_eq!(result.probability, 0.2);
        assert!(!result.at_risk);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }
}
