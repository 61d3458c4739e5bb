//! Logic Module - prediction engine
//!
//! ## Layout
//! - `artifacts` - load and cross-check the three training artifacts
//! - `features/` - request -> feature vector
//! - `model/` - forest inference, thresholds, clinical adjustment
//! - `explain/` - contributing factors and recommendations
//! - `formatter` - response body
//! - `predictor` - the request pipeline tying these together

pub mod artifacts;
pub mod features;
pub mod model;
pub mod explain;
pub mod formatter;
pub mod predictor;

pub use artifacts::{ArtifactError, ArtifactSet};
pub use predictor::{PredictError, RiskPredictor};
