//! Risk Thresholds
//!
//! Cut points that turn a probability into the binary class and the
//! three-tier risk label.

use serde::{Deserialize, Serialize};

/// `probability >= 0.5` is the positive class. This is the rule the reported
/// 88% accuracy / 0.908 AUC-ROC were measured with.
pub const POSITIVE_CLASS_THRESHOLD: f64 = 0.5;

/// Lower bound of the moderate tier
pub const MODERATE_RISK_THRESHOLD: f64 = 0.35;

/// Lower bound of the high tier
pub const HIGH_RISK_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Risk",
        }
    }

    pub const ALL: [RiskLevel; 3] = [Self::Low, Self::Moderate, Self::High];
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Threshold Configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Binary class cut point
    pub positive_class: f64,

    /// Moderate tier floor
    pub moderate: f64,

    /// High tier floor
    pub high: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            positive_class: POSITIVE_CLASS_THRESHOLD,
            moderate: MODERATE_RISK_THRESHOLD,
            high: HIGH_RISK_THRESHOLD,
        }
    }
}

impl RiskThresholds {
    pub fn is_positive(&self, probability: f64) -> bool {
        probability >= self.positive_class
    }

    pub fn classify(&self, probability: f64) -> RiskLevel {
        if probability >= self.high {
            RiskLevel::High
        } else if probability >= self.moderate {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}
