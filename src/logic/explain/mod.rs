//! Explain Module - contributing factors and recommendations

pub mod types;
pub mod engine;
pub mod recommend;

pub use types::{FactorKind, RiskFactor};
pub use engine::risk_factors;
pub use recommend::recommendations;
