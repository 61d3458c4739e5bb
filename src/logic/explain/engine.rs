use super::types::{FactorKind, RiskFactor};
use crate::models::PatientData;

/// Contributing-factor notes for one patient, in a fixed order
pub fn risk_factors(p: &PatientData) -> Vec<RiskFactor> {
    let mut factors = Vec::new();
    let age = p.age;

    if let Some(detail) = age_note(p) {
        factors.push(RiskFactor::new(FactorKind::Age, "Age", detail));
    }

    match p.smoking.as_str() {
        "Current" if age >= 50 => factors.push(RiskFactor::new(
            FactorKind::CurrentSmoker,
            "Smoking",
            "Current smoker - critical at this age (cumulative damage)",
        )),
        "Current" => factors.push(RiskFactor::new(
            FactorKind::CurrentSmoker,
            "Smoking",
            "Current smoker - major modifiable risk factor",
        )),
        "Former" => factors.push(RiskFactor::new(
            FactorKind::FormerSmoker,
            "Smoking",
            "Former smoker (residual risk, well done on quitting)",
        )),
        _ => {}
    }

    if p.has_diabetes() {
        let detail = if age >= 50 {
            "Diabetes present - very serious at this age (doubles cardiovascular risk)"
        } else {
            "Diabetes present - needs strict control to prevent complications"
        };
        factors.push(RiskFactor::new(FactorKind::Diabetes, "Diabetes", detail));
    }

    if p.has_obesity() {
        let detail = if age <= 40 {
            "Obesity present - especially concerning at this age"
        } else {
            "Obesity present - important modifiable risk factor"
        };
        factors.push(RiskFactor::new(FactorKind::Obesity, "Obesity", detail));
    }

    if p.has_family_history() {
        let detail = if age <= 45 {
            "Positive family history - highly relevant at this age (genetic predisposition)"
        } else {
            "Positive family history - raises baseline risk"
        };
        factors.push(RiskFactor::new(FactorKind::FamilyHistory, "Family History", detail));
    }

    let hours = p.exercise_hours;
    if hours < 0.5 {
        factors.push(RiskFactor::new(
            FactorKind::Sedentary,
            "Inactivity",
            format!("Extremely sedentary - only {}h/week (change urgently)", hours),
        ));
    } else if hours < 1.5 {
        factors.push(RiskFactor::new(
            FactorKind::Sedentary,
            "Inactivity",
            format!("Insufficient activity - {}h/week (recommended minimum: 2.5h)", hours),
        ));
    } else if hours < 2.5 {
        factors.push(RiskFactor::new(
            FactorKind::LowActivity,
            "Low Activity",
            format!("Exercise below optimal - {}h/week", hours),
        ));
    }

    let stress = p.stress_level;
    if stress >= 9 {
        factors.push(RiskFactor::new(
            FactorKind::SevereStress,
            "Stress",
            format!("Extreme stress - level {}/10 (directly affects the heart)", stress),
        ));
    } else if stress >= 8 {
        factors.push(RiskFactor::new(
            FactorKind::SevereStress,
            "Stress",
            format!("Very high stress - level {}/10 (proven cardiovascular damage)", stress),
        ));
    } else if stress >= 6 {
        factors.push(RiskFactor::new(
            FactorKind::ElevatedStress,
            "Stress",
            format!("Elevated stress - level {}/10 (can raise blood pressure)", stress),
        ));
    }

    if p.alcohol_intake == "Heavy" {
        let detail = if age >= 50 {
            "Heavy alcohol intake - especially harmful at this age"
        } else {
            "Heavy alcohol intake - cardiovascular risk factor"
        };
        factors.push(RiskFactor::new(FactorKind::HeavyAlcohol, "Alcohol", detail));
    }

    // Combinations
    if p.smoking == "Current" && p.has_diabetes() {
        factors.push(RiskFactor::new(
            FactorKind::SmokingDiabetes,
            "Critical Combination",
            "Diabetes + smoking = exponential risk",
        ));
    }
    if p.has_obesity() && p.has_diabetes() && hours < 1.0 {
        factors.push(RiskFactor::new(
            FactorKind::MetabolicSyndrome,
            "Metabolic Syndrome",
            "Obesity + diabetes + inactivity = very high risk",
        ));
    }
    if stress >= 8 && hours < 1.0 {
        factors.push(RiskFactor::new(
            FactorKind::StressInactivity,
            "Vicious Cycle",
            "High stress + inactivity reinforce each other",
        ));
    }

    factors
}

fn age_note(p: &PatientData) -> Option<String> {
    let age = p.age;
    let note = if p.is_male() {
        if age >= 60 {
            "high risk from advanced age"
        } else if age >= 45 {
            "moderate age-related risk"
        } else if age >= 35 {
            "onset of age-related risk"
        } else {
            return None;
        }
    } else if age >= 65 {
        "high post-menopausal risk"
    } else if age >= 55 {
        "moderate post-menopausal risk"
    } else if age >= 50 {
        "menopausal transition"
    } else {
        return None;
    };

    let who = if p.is_male() { "Male" } else { "Female" };
    Some(format!("{} years - {} ({})", age, who, note))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(p: &PatientData) -> Vec<FactorKind> {
        risk_factors(p).into_iter().map(|f| f.kind).collect()
    }

    #[test]
    fn test_reference_patient_factors() {
        let factors = risk_factors(&PatientData::reference());
        let kinds: Vec<FactorKind> = factors.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![FactorKind::Age, FactorKind::FamilyHistory, FactorKind::ElevatedStress]
        );
        assert_eq!(factors[0].detail, "55 years - Male (moderate age-related risk)");
        assert_eq!(factors[2].detail, "Elevated stress - level 6/10 (can raise blood pressure)");
    }

    #[test]
    fn test_young_woman_has_no_age_factor() {
        let mut patient = PatientData::reference();
        patient.gender = "Female".to_string();
        patient.age = 49;
        assert!(!kinds(&patient).contains(&FactorKind::Age));
    }

    #[test]
    fn test_combinations_listed_last() {
        let patient = PatientData {
            age: 62,
            gender: "Female".to_string(),
            smoking: "Current".to_string(),
            alcohol_intake: "Heavy".to_string(),
            exercise_hours: 0.2,
            diabetes: "Yes".to_string(),
            family_history: "No".to_string(),
            obesity: "Yes".to_string(),
            stress_level: 9,
        };

        let kinds = kinds(&patient);
        assert_eq!(
            &kinds[kinds.len() - 3..],
            &[
                FactorKind::SmokingDiabetes,
                FactorKind::MetabolicSyndrome,
                FactorKind::StressInactivity,
            ]
        );
        assert!(kinds.contains(&FactorKind::Sedentary));
        assert!(kinds.contains(&FactorKind::SevereStress));
    }

    #[test]
    fn test_activity_bands() {
        let mut patient = PatientData::reference();
        patient.exercise_hours = 2.0;
        assert!(kinds(&patient).contains(&FactorKind::LowActivity));
        patient.exercise_hours = 2.5;
        let k = kinds(&patient);
        assert!(!k.contains(&FactorKind::LowActivity) && !k.contains(&FactorKind::Sedentary));
    }
}
