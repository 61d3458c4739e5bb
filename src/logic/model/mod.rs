//! Model Module - Inference Engine
//!
//! The forest, the invoker that runs it, the class/tier thresholds and the
//! clinical adjustment applied on top of the raw probability.

pub mod forest;
pub mod inference;
pub mod threshold;
pub mod adjustment;

// Re-export common types
pub use forest::{ForestArtifact, RandomForest};
pub use inference::{predict, round_probability, InferenceError, PredictionResult, RiskModel};
pub use threshold::{RiskLevel, RiskThresholds};
