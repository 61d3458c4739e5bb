//! Artifact Store
//!
//! Loads the model, scaler and encoding table once at startup and verifies
//! they agree with each other before anything is served. The resulting
//! `ArtifactSet` is immutable and shared behind an `Arc`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::constants::{ENCODING_FILE, MODEL_FILE, SCALER_FILE};
use crate::logic::features::{EncodingInfo, FeatureEncoder, FeatureScaler, LayoutInfo};
use crate::logic::model::{self, ForestArtifact, RandomForest, RiskModel, RiskThresholds};
use crate::models::PatientData;

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {artifact} artifact: {reason}")]
    Invalid { artifact: &'static str, reason: String },

    #[error("artifact schema mismatch: {0}")]
    SchemaMismatch(String),
}

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// SHA-256 of each artifact file
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactChecksums {
    pub model: String,
    pub scaler: String,
    pub encoding: String,
}

/// Which artifacts made it into the set
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactStatus {
    pub model: bool,
    pub scaler: bool,
    pub encoding: bool,
}

impl ArtifactStatus {
    pub fn all_loaded(&self) -> bool {
        self.model && self.scaler && self.encoding
    }
}

/// Model summary for the metadata endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub model_type: &'static str,
    pub n_trees: usize,
    pub n_features: usize,
    pub layout: LayoutInfo,
    pub checksums: Option<ArtifactChecksums>,
    pub loaded_at: DateTime<Utc>,
}

/// The three artifacts, checked against each other
#[derive(Debug)]
pub struct ArtifactSet {
    encoder: FeatureEncoder,
    model: Box<dyn RiskModel>,
    status: ArtifactStatus,
    checksums: Option<ArtifactChecksums>,
    loaded_at: DateTime<Utc>,
}

impl ArtifactSet {
    /// Load and self-check the artifacts in `dir`
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        tracing::info!("Loading artifacts from {}", dir.display());

        let mut status = ArtifactStatus::default();

        let (info, encoding_sum) = read_artifact::<EncodingInfo>(&dir.join(ENCODING_FILE))?;
        status.encoding = true;

        let (scaler, scaler_sum) = read_artifact::<FeatureScaler>(&dir.join(SCALER_FILE))?;
        status.scaler = true;

        let (forest, model_sum) = read_artifact::<ForestArtifact>(&dir.join(MODEL_FILE))?;
        let forest = RandomForest::from_artifact(&forest)?;
        status.model = true;

        tracing::info!(
            "Loaded forest with {} trees over {} features",
            forest.n_trees(),
            forest.n_features()
        );

        let mut set = Self::assemble(&info, scaler, Box::new(forest), status)?;
        set.checksums = Some(ArtifactChecksums {
            model: model_sum,
            scaler: scaler_sum,
            encoding: encoding_sum,
        });

        Ok(set)
    }

    /// Build a set from in-memory artifacts, e.g. with a stub model
    pub fn from_parts(
        info: &EncodingInfo,
        scaler: FeatureScaler,
        model: Box<dyn RiskModel>,
    ) -> Result<Self, ArtifactError> {
        let status = ArtifactStatus {
            model: true,
            scaler: true,
            encoding: true,
        };
        Self::assemble(info, scaler, model, status)
    }

    fn assemble(
        info: &EncodingInfo,
        scaler: FeatureScaler,
        model: Box<dyn RiskModel>,
        status: ArtifactStatus,
    ) -> Result<Self, ArtifactError> {
        let encoder = FeatureEncoder::new(info, scaler)?;

        let set = Self {
            encoder,
            model,
            status,
            checksums: None,
            loaded_at: Utc::now(),
        };
        set.self_check()?;

        Ok(set)
    }

    /// Encode and score the reference patient.
    /// Any disagreement between encoder and model surfaces here, not per request.
    pub fn self_check(&self) -> Result<(), ArtifactError> {
        let expected = self.model.n_features();
        if self.encoder.len() != expected {
            return Err(ArtifactError::SchemaMismatch(format!(
                "encoder emits {} columns but the model expects {}",
                self.encoder.len(),
                expected
            )));
        }

        let fixture = PatientData::reference();
        let vector = self.encoder.encode(&fixture).map_err(|e| {
            ArtifactError::SchemaMismatch(format!("reference patient does not encode: {}", e))
        })?;

        let result = model::predict(&vector, self.model.as_ref(), &RiskThresholds::default())
            .map_err(|e| {
                ArtifactError::SchemaMismatch(format!("reference patient does not score: {}", e))
            })?;

        tracing::info!(
            "Artifact self-check passed: {} columns, layout {:08x}, reference probability {:.4}",
            vector.len(),
            vector.layout_hash,
            result.model_probability
        );

        Ok(())
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn model(&self) -> &dyn RiskModel {
        self.model.as_ref()
    }

    pub fn status(&self) -> ArtifactStatus {
        self.status
    }

    pub fn checksums(&self) -> Option<&ArtifactChecksums> {
        self.checksums.as_ref()
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            model_type: "random_forest",
            n_trees: self.model.n_trees(),
            n_features: self.model.n_features(),
            layout: LayoutInfo::from(self.encoder.plan()),
            checksums: self.checksums.clone(),
            loaded_at: self.loaded_at,
        }
    }
}

/// Read, checksum and parse one JSON artifact
fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<(T, String), ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::Missing(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let checksum = hex::encode(Sha256::digest(&bytes));

    let value = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Read {} (sha256 {})", path.display(), checksum);

    Ok((value, checksum))
}
