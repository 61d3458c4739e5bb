//! StandardScaler parameters

use serde::{Deserialize, Serialize};

use crate::logic::artifacts::ArtifactError;

/// Per-column mean/scale, applied as `(x - mean) / scale`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureScaler {
    /// Column names the scaler was fitted on, when recorded
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl FeatureScaler {
    /// Check the parameters against the artifact's scaled-column list
    pub fn validate(&self, scaler_features: &[String]) -> Result<(), ArtifactError> {
        if self.mean.len() != self.scale.len() {
            return Err(ArtifactError::Invalid {
                artifact: "scaler",
                reason: format!(
                    "{} means but {} scales",
                    self.mean.len(),
                    self.scale.len()
                ),
            });
        }

        if let Some(i) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(ArtifactError::Invalid {
                artifact: "scaler",
                reason: format!("mean[{}] is not finite", i),
            });
        }

        if let Some(i) = self.scale.iter().position(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ArtifactError::Invalid {
                artifact: "scaler",
                reason: format!("scale[{}] = {} is not a positive number", i, self.scale[i]),
            });
        }

        if self.mean.len() != scaler_features.len() {
            return Err(ArtifactError::SchemaMismatch(format!(
                "scaler fitted on {} columns, encoding lists {} scaled columns",
                self.mean.len(),
                scaler_features.len()
            )));
        }

        if let Some(names) = &self.feature_names {
            if names.as_slice() != scaler_features {
                return Err(ArtifactError::SchemaMismatch(format!(
                    "scaler columns {:?} differ from encoding scaled columns {:?}",
                    names, scaler_features
                )));
            }
        }

        Ok(())
    }

    /// Scale `values[indices[i]]` with parameter `i`
    pub fn transform(&self, values: &mut [f64], indices: &[usize]) {
        for (i, &column) in indices.iter().enumerate() {
            values[column] = (values[column] - self.mean[i]) / self.scale[i];
        }
    }
}
