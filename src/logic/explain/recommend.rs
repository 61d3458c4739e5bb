use super::types::{FactorKind, RiskFactor};
use crate::logic::model::RiskLevel;

/// Below this probability the response adds positive reinforcement
const EXCELLENT_PROFILE: f64 = 0.2;

pub fn recommendations(level: RiskLevel, probability: f64, factors: &[RiskFactor]) -> Vec<String> {
    let has = |kind: FactorKind| factors.iter().any(|f| f.kind == kind);
    let mut out: Vec<&str> = Vec::new();

    match level {
        RiskLevel::High => out.extend([
            "HIGH PRIORITY: see a cardiologist immediately",
            "Urgent tests: ECG, full lipid panel, echocardiogram",
            "Discuss preventive medication with your doctor (statins, aspirin)",
            "Check blood pressure weekly",
        ]),
        RiskLevel::Moderate => out.extend([
            "Schedule a medical appointment within the next 2-4 weeks",
            "Get cardiovascular tests: ECG, lipid panel",
            "Medical check-ups every 3-6 months",
            "Check blood pressure monthly",
        ]),
        RiskLevel::Low => out.extend([
            "Excellent cardiovascular profile - keep it up",
            "Keep up yearly preventive check-ups",
            "Focus on maintaining your current healthy habits",
            "Your lifestyle is protecting your heart",
        ]),
    }

    if has(FactorKind::CurrentSmoker) {
        out.push("CRITICAL: quit smoking today - it is your top priority");
        out.push("Get professional support from a smoking cessation helpline");
    } else if has(FactorKind::FormerSmoker) {
        out.push("Well done on quitting smoking - stay smoke-free");
    }

    if has(FactorKind::Sedentary) {
        out.push("URGENT: start a gradual exercise programme");
        out.push("Begin with 15 minutes of daily walking and build up");
        out.push("Goal: 150 minutes of moderate exercise per week");
    } else if level == RiskLevel::Low {
        out.push("Your activity level is protecting your heart");
    }

    if has(FactorKind::Obesity) {
        out.push("IMPORTANT: weight-loss plan with a nutritionist");
        out.push("A Mediterranean diet is recommended for heart health");
        out.push("Initial goal: lose 5-10% of current weight");
    }

    if has(FactorKind::SevereStress) {
        out.push("URGENT: stress management techniques - meditation, yoga");
        out.push("Prioritise 7-8 hours of restful sleep");
        out.push("Consider psychological support for stress management");
    } else if has(FactorKind::ElevatedStress) {
        out.push("Practise daily relaxation: 10-15 minutes");
    }

    if has(FactorKind::Diabetes) {
        out.push("CRITICAL: strict diabetes control with an endocrinologist");
        out.push("HbA1c target: below 7%");
        out.push("See a nutritionist specialised in diabetes");
    }

    if has(FactorKind::HeavyAlcohol) {
        out.push("Cut alcohol to at most 1-2 drinks per day");
        out.push("Plan alcohol-free days during the week");
    }

    if probability < EXCELLENT_PROFILE {
        out.push("Congratulations - your cardiovascular profile is excellent");
        out.push("Your healthy habits are your best preventive medicine");
    }

    out.into_iter().map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::explain::risk_factors;
    use crate::models::PatientData;

    fn factor(kind: FactorKind) -> RiskFactor {
        RiskFactor::new(kind, "test", "")
    }

    #[test]
    fn test_tier_block_comes_first() {
        let high = recommendations(RiskLevel::High, 0.8, &[]);
        assert!(high[0].starts_with("HIGH PRIORITY"));
        assert_eq!(high.len(), 4);

        let moderate = recommendations(RiskLevel::Moderate, 0.4, &[]);
        assert!(moderate[0].starts_with("Schedule"));
    }

    #[test]
    fn test_low_risk_reinforcement() {
        let recs = recommendations(RiskLevel::Low, 0.1, &[]);
        assert!(recs.iter().any(|r| r.contains("activity level is protecting")));
        assert!(recs.last().unwrap().contains("best preventive medicine"));

        let recs = recommendations(RiskLevel::Low, 0.3, &[]);
        assert!(!recs.iter().any(|r| r.starts_with("Congratulations")));
    }

    #[test]
    fn test_factor_blocks() {
        let factors = [
            factor(FactorKind::CurrentSmoker),
            factor(FactorKind::SevereStress),
            factor(FactorKind::Diabetes),
        ];
        let recs = recommendations(RiskLevel::High, 0.9, &factors);
        assert!(recs.iter().any(|r| r.contains("quit smoking today")));
        assert!(recs.iter().any(|r| r.contains("meditation")));
        assert!(recs.iter().any(|r| r.contains("HbA1c")));
        assert!(!recs.iter().any(|r| r.contains("10-15 minutes")));
    }

    #[test]
    fn test_urgent_stress_block_from_level_eight() {
        for (stress, urgent) in [(7, false), (8, true), (9, true), (10, true)] {
            let mut patient = PatientData::reference();
            patient.stress_level = stress;
            let factors = risk_factors(&patient);

            let recs = recommendations(RiskLevel::Moderate, 0.4, &factors);
            let mentions = |text: &str| recs.iter().any(|r| r.contains(text));
            assert_eq!(mentions("meditation"), urgent, "stress {}", stress);
            assert_eq!(mentions("10-15 minutes"), !urgent, "stress {}", stress);
        }
    }

    #[test]
    fn test_former_smoker_praised() {
        let recs = recommendations(RiskLevel::Moderate, 0.4, &[factor(FactorKind::FormerSmoker)]);
        assert!(recs.iter().any(|r| r.contains("Well done on quitting")));
        assert!(!recs.iter().any(|r| r.contains("quit smoking today")));
    }
}
