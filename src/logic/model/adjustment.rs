//! Clinical Adjustment
//!
//! Blends the forest probability with a rule-based score built from
//! established cardiovascular risk and protective factors. Deterministic:
//! the same patient and model probability always give the same result.

use crate::models::PatientData;

/// Final bounds of an adjusted probability
const ADJUSTED_MIN: f64 = 0.01;
const ADJUSTED_MAX: f64 = 0.99;

/// Bounds of the rule-based probability before blending
const LOGIC_MIN: f64 = 0.02;
const LOGIC_MAX: f64 = 0.98;

/// Risk and protective mass accumulated from the patient's profile
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FactorScore {
    pub risk: f64,
    pub protective: f64,
}

impl FactorScore {
    pub fn net(&self) -> f64 {
        self.risk - self.protective
    }

    pub fn total(&self) -> f64 {
        self.risk + self.protective
    }

    /// (model weight, logic weight). More identified factors shift trust to the rules.
    pub fn blend_weights(&self) -> (f64, f64) {
        let total = self.total();
        if total > 0.4 {
            (0.45, 0.55)
        } else if total > 0.2 {
            (0.55, 0.45)
        } else {
            (0.65, 0.35)
        }
    }
}

pub fn score(p: &PatientData) -> FactorScore {
    let mut s = FactorScore::default();
    let age = p.age;

    // Age, with earlier onset for men
    if p.is_male() {
        if age >= 65 {
            s.risk += 0.28;
        } else if age >= 55 {
            s.risk += 0.18;
        } else if age >= 45 {
            s.risk += 0.12;
        } else if age >= 35 {
            s.risk += 0.05;
        } else if age <= 25 {
            s.protective += 0.18;
        }
    } else if age >= 70 {
        s.risk += 0.25;
    } else if age >= 60 {
        s.risk += 0.15;
    } else if age >= 50 {
        s.risk += 0.08;
    } else if age >= 40 {
        s.risk += 0.03;
    } else if age <= 30 {
        s.protective += 0.20;
    }

    match p.smoking.as_str() {
        "Current" => {
            s.risk += 0.22;
            if age >= 50 {
                s.risk += 0.08;
            } else if age >= 35 {
                s.risk += 0.04;
            }
        }
        "Former" => s.risk += if age >= 50 { 0.08 } else { 0.04 },
        _ => {}
    }

    if p.has_diabetes() {
        s.risk += if age >= 50 { 0.25 } else { 0.20 };
    }

    if p.has_obesity() {
        s.risk += if age <= 40 { 0.15 } else { 0.12 };
    }

    if p.has_family_history() {
        s.risk += if age <= 45 { 0.12 } else { 0.08 };
    }

    if p.alcohol_intake == "Heavy" {
        s.risk += if age >= 50 { 0.12 } else { 0.08 };
    }

    // Stress compounds existing risk
    if p.stress_level >= 8 {
        let multiplier = (1.0 + s.risk * 0.5).min(1.5);
        s.risk += 0.12 * multiplier;
    } else if p.stress_level >= 6 {
        s.risk += 0.06;
    }

    let exercise = p.exercise_hours;
    if exercise >= 7.0 {
        s.protective += 0.20;
    } else if exercise >= 5.0 {
        s.protective += 0.16;
    } else if exercise >= 3.0 {
        s.protective += 0.12;
    } else if exercise >= 1.5 {
        s.protective += 0.07;
    } else if exercise >= 1.0 {
        s.protective += 0.03;
    } else if exercise < 0.5 {
        s.risk += 0.12;
    } else {
        s.risk += 0.08;
    }

    if p.smoking == "Never" {
        s.protective += if age >= 50 { 0.15 } else { 0.10 };
    }

    match p.alcohol_intake.as_str() {
        "None" => s.protective += 0.06,
        "Light" => s.protective += 0.08,
        "Moderate" => s.protective += if age >= 40 { 0.04 } else { 0.01 },
        _ => {}
    }

    if p.stress_level <= 2 {
        s.protective += 0.12;
    } else if p.stress_level <= 4 {
        s.protective += 0.08;
    } else if p.stress_level <= 6 {
        s.protective += 0.04;
    }

    if !p.has_diabetes() {
        s.protective += 0.06;
    }
    if !p.has_obesity() {
        s.protective += 0.06;
    }
    if !p.has_diabetes() && !p.has_obesity() && p.smoking == "Never" {
        s.protective += 0.05;
    }

    s
}

/// Count of the major modifiable risk factors present
pub fn major_risk_factors(p: &PatientData) -> usize {
    [
        p.smoking == "Current",
        p.has_diabetes(),
        p.has_obesity(),
        p.has_family_history(),
        p.exercise_hours < 1.0,
        p.stress_level >= 8,
        p.alcohol_intake == "Heavy",
    ]
    .into_iter()
    .filter(|present| *present)
    .count()
}

/// Adjusted probability in [0.01, 0.99]
pub fn adjust(p: &PatientData, model_probability: f64) -> f64 {
    let s = score(p);
    let (model_weight, logic_weight) = s.blend_weights();

    let logic_probability = (model_probability + s.net()).clamp(LOGIC_MIN, LOGIC_MAX);
    let mut adjusted = model_weight * model_probability + logic_weight * logic_probability;

    let age = p.age;
    let never_smoked = p.smoking == "Never";
    let current_smoker = p.smoking == "Current";

    // Young and fully healthy
    if age <= 25
        && never_smoked
        && !p.has_diabetes()
        && !p.has_obesity()
        && p.exercise_hours >= 3.0
        && p.stress_level <= 5
    {
        adjusted = adjusted.min(0.12);
    }

    // Unambiguous high-risk profile
    if age >= 60 && current_smoker && p.has_diabetes() {
        adjusted = adjusted.max(0.65);
    }

    // Young, active, non-smoking woman
    if !p.is_male() && age <= 35 && never_smoked && p.exercise_hours >= 2.0 {
        adjusted = adjusted.min(0.08);
    }

    // Young male smoker with a metabolic condition
    if p.is_male() && age <= 35 && current_smoker && (p.has_diabetes() || p.has_obesity()) {
        adjusted = adjusted.max(0.25);
    }

    // Metabolic syndrome
    if p.has_obesity() && p.has_diabetes() && p.exercise_hours < 1.0 {
        adjusted = adjusted.max(0.55);
    }

    // Intense exercise with low stress
    if p.exercise_hours >= 6.0 && never_smoked && p.stress_level <= 4 {
        adjusted *= 0.8;
    }

    let major = major_risk_factors(p);
    let floor = if major >= 4 {
        Some(if age >= 50 {
            0.60
        } else if age >= 30 {
            0.45
        } else {
            0.35
        })
    } else if major == 3 && age >= 45 {
        Some(0.50)
    } else if major == 3 && age >= 25 {
        Some(0.40)
    } else if major == 2 && age >= 55 {
        Some(0.40)
    } else {
        None
    };
    if let Some(floor) = floor {
        adjusted = adjusted.max(floor);
    }

    if current_smoker && p.has_diabetes() {
        adjusted *= 1.15;
    }
    if p.stress_level >= 8 && p.exercise_hours < 1.0 {
        adjusted *= 1.10;
    }

    adjusted.clamp(ADJUSTED_MIN, ADJUSTED_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy_young_woman() -> PatientData {
        PatientData {
            age: 28,
            gender: "Female".to_string(),
            smoking: "Never".to_string(),
            alcohol_intake: "None".to_string(),
            exercise_hours: 5.0,
            diabetes: "No".to_string(),
            family_history: "No".to_string(),
            obesity: "No".to_string(),
            stress_level: 3,
        }
    }

    fn high_risk_man() -> PatientData {
        PatientData {
            age: 68,
            gender: "Male".to_string(),
            smoking: "Current".to_string(),
            alcohol_intake: "Heavy".to_string(),
            exercise_hours: 0.0,
            diabetes: "Yes".to_string(),
            family_history: "Yes".to_string(),
            obesity: "Yes".to_string(),
            stress_level: 9,
        }
    }

    #[test]
    fn test_adjusted_stays_in_bounds() {
        for base in [0.0, 0.25, 0.5, 0.75, 1.0] {
            for patient in [healthy_young_woman(), high_risk_man(), PatientData::reference()] {
                let adjusted = adjust(&patient, base);
                assert!((ADJUSTED_MIN..=ADJUSTED_MAX).contains(&adjusted), "{}", adjusted);
            }
        }
    }

    #[test]
    fn test_healthy_young_woman_capped() {
        assert!(adjust(&healthy_young_woman(), 0.9) <= 0.08);
    }

    #[test]
    fn test_high_risk_profile_floored() {
        assert_eq!(major_risk_factors(&high_risk_man()), 7);
        assert!(adjust(&high_risk_man(), 0.05) >= 0.65);
    }

    #[test]
    fn test_metabolic_syndrome_floor() {
        let patient = PatientData {
            age: 40,
            gender: "Female".to_string(),
            smoking: "Never".to_string(),
            alcohol_intake: "None".to_string(),
            exercise_hours: 0.5,
            diabetes: "Yes".to_string(),
            family_history: "No".to_string(),
            obesity: "Yes".to_string(),
            stress_level: 5,
        };
        assert!(adjust(&patient, 0.0) >= 0.55);
    }

    #[test]
    fn test_stress_multiplier_capped() {
        let mut patient = high_risk_man();
        patient.stress_level = 7;
        let without = score(&patient).risk;
        patient.stress_level = 8;
        let with = score(&patient).risk;
        assert!((with - (without - 0.06) - 0.12 * 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_blend_weights() {
        let few = FactorScore { risk: 0.1, protective: 0.05 };
        let many = FactorScore { risk: 0.3, protective: 0.2 };
        assert_eq!(few.blend_weights(), (0.65, 0.35));
        assert_eq!(many.blend_weights(), (0.45, 0.55));
    }

    #[test]
    fn test_adjust_is_deterministic() {
        let patient = PatientData::reference();
        assert_eq!(adjust(&patient, 0.42), adjust(&patient, 0.42));
    }
}
