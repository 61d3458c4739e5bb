use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactorKind {
    Age,
    CurrentSmoker,
    FormerSmoker,
    Diabetes,
    Obesity,
    FamilyHistory,
    Sedentary,
    LowActivity,
    SevereStress,
    ElevatedStress,
    HeavyAlcohol,
    SmokingDiabetes,
    MetabolicSyndrome,
    StressInactivity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskFactor {
    #[serde(skip)]
    pub kind: FactorKind,
    pub factor: String,
    pub detail: String, // human-readable context
}

impl RiskFactor {
    pub fn new(kind: FactorKind, factor: &str, detail: impl Into<String>) -> Self {
        Self {
            kind,
            factor: factor.to_string(),
            detail: detail.into(),
        }
    }
}
