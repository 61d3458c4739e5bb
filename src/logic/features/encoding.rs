//! Categorical encoding table
//!
//! Category -> numeric code per categorical field, as fitted at training time.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::layout::CategoricalField;
use crate::logic::artifacts::ArtifactError;

/// Ordinal codes the model was trained with for alcohol intake.
/// Installed when the encoding artifact carries no entry for the field.
pub const DEFAULT_ALCOHOL_CODES: [(&str, f64); 4] = [
    ("None", 0.0),
    ("Light", 1.0),
    ("Moderate", 2.0),
    ("Heavy", 3.0),
];

/// On-disk layout of `encoding_info.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingInfo {
    /// Column order of the training matrix
    pub features: Vec<String>,

    /// Columns the scaler was fitted on, in scaler parameter order
    #[serde(default)]
    pub scaler_features: Vec<String>,

    /// Training column name -> category -> code
    pub encodings: HashMap<String, HashMap<String, f64>>,
}

/// Validated lookup table keyed by request field
#[derive(Debug, Clone)]
pub struct EncodingTable {
    codes: HashMap<CategoricalField, BTreeMap<String, f64>>,
}

impl EncodingTable {
    pub fn from_info(info: &EncodingInfo) -> Result<Self, ArtifactError> {
        let mut codes: HashMap<CategoricalField, BTreeMap<String, f64>> = HashMap::new();

        for (name, categories) in &info.encodings {
            let Some(field) = CategoricalField::from_name(name) else {
                tracing::debug!("Ignoring encoding for unused column '{}'", name);
                continue;
            };

            if let Some((category, code)) = categories.iter().find(|(_, code)| !code.is_finite()) {
                return Err(ArtifactError::Invalid {
                    artifact: "encoding",
                    reason: format!("{}/{} has non-finite code {}", name, category, code),
                });
            }

            codes.insert(field, categories.iter().map(|(k, v)| (k.clone(), *v)).collect());
        }

        if !codes.contains_key(&CategoricalField::AlcoholIntake) {
            tracing::warn!("No alcohol intake encoding in artifact, using default ordinal codes");
            codes.insert(
                CategoricalField::AlcoholIntake,
                DEFAULT_ALCOHOL_CODES
                    .iter()
                    .map(|(k, v)| (k.to_string(), *v))
                    .collect(),
            );
        }

        for field in CategoricalField::ALL {
            let Some(table) = codes.get(&field) else {
                return Err(ArtifactError::Invalid {
                    artifact: "encoding",
                    reason: format!("no encoding for '{}'", field.display()),
                });
            };

            let missing: Vec<&str> = field
                .expected_categories()
                .iter()
                .copied()
                .filter(|c| !table.contains_key(*c))
                .collect();
            if !missing.is_empty() {
                return Err(ArtifactError::SchemaMismatch(format!(
                    "{} encoding lacks categories {:?}",
                    field.display(),
                    missing
                )));
            }
        }

        Ok(Self { codes })
    }

    /// Code for a category, `None` when the category is unknown
    pub fn code(&self, field: CategoricalField, value: &str) -> Option<f64> {
        self.codes.get(&field).and_then(|t| t.get(value)).copied()
    }

    pub fn contains(&self, field: CategoricalField, value: &str) -> bool {
        self.code(field, value).is_some()
    }

    /// Accepted categories in sorted order
    pub fn categories(&self, field: CategoricalField) -> Vec<&str> {
        self.codes
            .get(&field)
            .map(|t| t.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
