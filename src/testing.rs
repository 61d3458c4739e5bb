//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use crate::logic::artifacts::ArtifactSet;
use crate::logic::features::{EncodingInfo, FeatureEncoder, FeatureScaler};
use crate::config::Config;
use crate::logic::model::{InferenceError, RiskModel};
use crate::logic::RiskPredictor;
use crate::AppState;

/// Label-encoded columns in training order
pub fn ordinal_columns() -> Vec<String> {
    [
        "Age",
        "Gender",
        "Smoking",
        "Alcohol Intake",
        "Exercise Hours",
        "Diabetes",
        "Family History",
        "Obesity",
        "Stress Level",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn codes(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

pub fn sample_encoding_info() -> EncodingInfo {
    let yes_no = codes(&[("No", 0.0), ("Yes", 1.0)]);

    let mut encodings = HashMap::new();
    encodings.insert("Gender".to_string(), codes(&[("Female", 0.0), ("Male", 1.0)]));
    encodings.insert(
        "Smoking".to_string(),
        codes(&[("Current", 0.0), ("Former", 1.0), ("Never", 2.0)]),
    );
    encodings.insert(
        "Alcohol Intake".to_string(),
        codes(&[("None", 0.0), ("Light", 1.0), ("Moderate", 2.0), ("Heavy", 3.0)]),
    );
    encodings.insert("Diabetes".to_string(), yes_no.clone());
    encodings.insert("Family History".to_string(), yes_no.clone());
    encodings.insert("Obesity".to_string(), yes_no);

    EncodingInfo {
        features: ordinal_columns(),
        scaler_features: vec![
            "Age".to_string(),
            "Exercise Hours".to_string(),
            "Stress Level".to_string(),
        ],
        encodings,
    }
}

pub fn sample_scaler() -> FeatureScaler {
    FeatureScaler {
        feature_names: None,
        mean: vec![52.0, 4.0, 5.5],
        scale: vec![15.0, 2.5, 2.5],
    }
}

pub fn sample_encoder() -> FeatureEncoder {
    FeatureEncoder::new(&sample_encoding_info(), sample_scaler())
        .expect("sample artifacts are valid")
}

/// Model stub returning a fixed probability
#[derive(Debug, Clone)]
pub struct FixedProbability {
    pub probability: f64,
    pub n_features: usize,
    pub trees: Option<Vec<f64>>,
}

impl FixedProbability {
    pub fn new(probability: f64) -> Self {
        Self {
            probability,
            n_features: 9,
            trees: None,
        }
    }
}

impl RiskModel for FixedProbability {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_trees(&self) -> usize {
        self.trees.as_ref().map_or(1, Vec::len)
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.n_features {
            return Err(InferenceError::FeatureCount {
                expected: self.n_features,
                actual: features.len(),
            });
        }
        Ok(self.probability)
    }

    fn tree_probabilities(&self, _features: &[f64]) -> Option<Vec<f64>> {
        self.trees.clone()
    }
}

pub fn sample_artifacts(probability: f64) -> ArtifactSet {
    ArtifactSet::from_parts(
        &sample_encoding_info(),
        sample_scaler(),
        Box::new(FixedProbability::new(probability)),
    )
    .expect("sample artifacts pass the self-check")
}

/// Router state over the stub model
pub fn sample_state() -> AppState {
    AppState {
        predictor: Arc::new(RiskPredictor::new(sample_artifacts(0.42), true)),
        config: Config::default(),
    }
}
