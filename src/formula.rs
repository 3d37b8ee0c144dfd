//! Deterministic rule-based life-expectancy estimate.
//!
//! The rule table is declarative data: an ordered list of predicates with a
//! factor name and a signed year impact. Evaluation order is fixed
//! (smoking, alcohol, exercise, diet) and every matching rule fires. The
//! estimate is the regional baseline plus the sum of fired impacts, a pure
//! function of the profile's four lifestyle fields.

use crate::models::{AdjustmentEntry, HealthProfile};

/// One row of the lifestyle rule table.
pub struct LifestyleRule {
    /// Human-readable factor name, surfaced verbatim in adjustments and the
    /// narrative (articles like "a " are stripped by the narrative layer).
    pub factor: &'static str,
    /// Signed impact in years.
    pub impact: f64,
    applies: fn(&HealthProfile) -> bool,
}

/// The fixed rule table. The exercise pair and the diet pair are mutually
/// exclusive by construction of their predicates; smoking and alcohol are
/// independent single conditions.
pub const LIFESTYLE_RULES: [LifestyleRule; 6] = [
    LifestyleRule {
        factor: "Smoking",
        impact: -7.0,
        applies: |p| matches!(p.smoking.as_deref(), Some("Daily") | Some("Occasionally")),
    },
    LifestyleRule {
        factor: "Daily Alcohol",
        impact: -5.0,
        applies: |p| p.alcohol.as_deref() == Some("Daily"),
    },
    LifestyleRule {
        factor: "Lack of Exercise",
        impact: -4.0,
        applies: |p| !p.has_exercise(),
    },
    LifestyleRule {
        factor: "Regular Exercise",
        impact: 4.5,
        applies: |p| p.has_exercise(),
    },
    LifestyleRule {
        factor: "a High Quality Diet",
        impact: 5.0,
        applies: |p| p.diet_quality.as_deref() == Some("High"),
    },
    LifestyleRule {
        factor: "a Low Quality Diet",
        impact: -5.0,
        applies: |p| p.diet_quality.as_deref() == Some("Low"),
    },
];

/// Evaluates the rule table against a profile, in table order.
pub fn evaluate_adjustments(profile: &HealthProfile) -> Vec<AdjustmentEntry> {
    LIFESTYLE_RULES
        .iter()
        .filter(|rule| (rule.applies)(profile))
        .map(|rule| AdjustmentEntry {
            factor: rule.factor.to_string(),
            impact: rule.impact,
        })
        .collect()
}

/// Formula estimate: regional baseline plus the sum of fired impacts.
pub fn formula_estimate(baseline: f64, adjustments: &[AdjustmentEntry]) -> f64 {
    baseline + adjustments.iter().map(|a| a.impact).sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(data: serde_json::Value) -> HealthProfile {
        HealthProfile::from_json(&data).unwrap()
    }

    #[test]
    fn healthy_profile_fires_exercise_and_diet_bonuses() {
        let p = profile(json!({
            "Age": 35, "Smoking": "Never", "Alcohol": "Never",
            "Exercise Type": "Yoga", "Diet Quality": "High",
        }));

        let adjustments = evaluate_adjustments(&p);
        assert_eq!(
            adjustments,
            vec![
                AdjustmentEntry { factor: "Regular Exercise".to_string(), impact: 4.5 },
                AdjustmentEntry { factor: "a High Quality Diet".to_string(), impact: 5.0 },
            ]
        );
        assert!((formula_estimate(77.8, &adjustments) - 87.3).abs() < 1e-9);
    }

    #[test]
    fn worst_case_profile_sums_all_penalties() {
        let p = profile(json!({
            "Age": 55, "Smoking": "Daily", "Alcohol": "Daily",
            "Exercise Type": "None", "Diet Quality": "Low",
        }));

        let adjustments = evaluate_adjustments(&p);
        let total: f64 = adjustments.iter().map(|a| a.impact).sum();
        assert_eq!(total, -21.0);
        assert!((formula_estimate(75.3, &adjustments) - 54.3).abs() < 1e-9);
    }

    #[test]
    fn occasional_smoking_penalized_like_daily() {
        let p = profile(json!({"Age": 40, "Smoking": "Occasionally"}));
        let adjustments = evaluate_adjustments(&p);
        assert!(adjustments.iter().any(|a| a.factor == "Smoking" && a.impact == -7.0));
    }

    #[test]
    fn occasional_alcohol_is_not_penalized() {
        let p = profile(json!({"Age": 40, "Alcohol": "Occasionally"}));
        let adjustments = evaluate_adjustments(&p);
        assert!(!adjustments.iter().any(|a| a.factor == "Daily Alcohol"));
    }

    #[test]
    fn exactly_one_exercise_rule_fires() {
        for exercise in [json!("None"), json!("Gym"), json!(null)] {
            let p = profile(json!({"Age": 40, "Exercise Type": exercise}));
            let adjustments = evaluate_adjustments(&p);
            let exercise_rules = adjustments
                .iter()
                .filter(|a| a.factor.contains("Exercise"))
                .count();
            assert_eq!(exercise_rules, 1);
        }
    }

    #[test]
    fn medium_diet_fires_no_diet_rule() {
        let p = profile(json!({"Age": 40, "Diet Quality": "Medium"}));
        let adjustments = evaluate_adjustments(&p);
        assert!(!adjustments.iter().any(|a| a.factor.contains("Diet")));
    }

    #[test]
    fn missing_lifestyle_fields_leave_only_lack_of_exercise() {
        let p = profile(json!({"Age": 40}));
        let adjustments = evaluate_adjustments(&p);
        assert_eq!(adjustments.len(), 1);
        assert_eq!(adjustments[0].factor, "Lack of Exercise");
    }
}
