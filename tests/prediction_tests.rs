/// End-to-end tests for the prediction pipeline against the shipped
/// artifacts: encoding, formula, reconciliation, age floor, narrative,
/// and recommendations together.
use rust_lifespan_api::artifacts::ModelArtifacts;
use rust_lifespan_api::errors::AppError;
use rust_lifespan_api::models::HealthProfile;
use rust_lifespan_api::prediction::run_prediction;
use serde_json::json;

fn artifacts() -> ModelArtifacts {
    // cargo test runs from the crate root, where the artifact dir lives
    ModelArtifacts::load("models").expect("model artifacts should load")
}

fn profile(data: serde_json::Value) -> HealthProfile {
    HealthProfile::from_json(&data).unwrap()
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    #[test]
    fn healthy_kerala_profile_outperforms_baseline() {
        let artifacts = artifacts();
        let p = profile(json!({
            "Age": 35, "State": "Kerala",
            "Smoking": "Never", "Alcohol": "Never",
            "Exercise Type": "Yoga", "Diet Quality": "High",
        }));

        let result = run_prediction(&artifacts, &p).unwrap();

        // Formula: 77.8 + 4.5 + 5.0 = 87.3; the model correction is capped
        // at +-5 and the age floor (43) cannot bind here.
        assert_eq!(result.adjustments.len(), 2);
        assert_eq!(result.adjustments[0].factor, "Regular Exercise");
        assert_eq!(result.adjustments[0].impact, 4.5);
        assert_eq!(result.adjustments[1].factor, "a High Quality Diet");
        assert_eq!(result.adjustments[1].impact, 5.0);

        assert!(result.prediction >= 82.3 && result.prediction <= 92.3);
        assert!(result.prediction - 35.0 >= 8.0);
        assert!(result.summary.contains("more years than the average"));
        assert!(result.summary.contains("Kerala"));
        assert!(result.summary.contains("77.8"));
    }

    #[test]
    fn worst_case_delhi_profile_hits_the_age_floor() {
        let artifacts = artifacts();
        let p = profile(json!({
            "Age": 55, "State": "Delhi",
            "Smoking": "Daily", "Alcohol": "Daily",
            "Exercise Type": "None", "Diet Quality": "Low",
        }));

        let result = run_prediction(&artifacts, &p).unwrap();

        let total: f64 = result.adjustments.iter().map(|a| a.impact).sum();
        assert_eq!(total, -21.0);

        // Formula lands at 54.3; even a +5 model correction stays under the
        // 55 + 8 floor, so the floor dominates the final value.
        assert_eq!(result.prediction, 63.0);
        assert!(result.summary.contains("fewer years than the average"));
        assert!(result.summary.contains("Smoking"));
    }

    #[test]
    fn unknown_region_falls_back_to_default_baseline() {
        let artifacts = artifacts();
        let p = profile(json!({
            "Age": 40, "State": "Atlantis", "Exercise Type": "Gym",
        }));

        let result = run_prediction(&artifacts, &p).unwrap();
        assert!(result.summary.contains("Atlantis"));
        assert!(result.summary.contains("72.0 years"));
    }

    #[test]
    fn unknown_diet_label_reports_the_full_vocabulary() {
        let artifacts = artifacts();
        let p = profile(json!({"Age": 40, "Diet Quality": "Purple"}));

        let err = run_prediction(&artifacts, &p).unwrap_err();
        match err {
            AppError::Encoding {
                field,
                value,
                accepted,
            } => {
                assert_eq!(field, "Diet Quality");
                assert_eq!(value, "Purple");
                assert_eq!(accepted, vec!["High", "Low", "Medium"]);
            }
            other => panic!("expected encoding error, got {:?}", other),
        }
    }

    #[test]
    fn past_baseline_age_gets_congratulatory_summary() {
        let artifacts = artifacts();
        let p = profile(json!({
            "Age": 80, "State": "Kerala", "Exercise Type": "Walking",
        }));

        let result = run_prediction(&artifacts, &p).unwrap();
        assert!(result.summary.starts_with("Congratulations!"));
        // Floor still applies: at least four remaining years past 70
        assert!(result.prediction - 80.0 >= 4.0);
    }
}

#[cfg(test)]
mod pipeline_tests {
    use super::*;

    #[test]
    fn identical_profiles_produce_identical_results() {
        let artifacts = artifacts();
        let data = json!({
            "Age": 48, "State": "Punjab", "Smoking": "Occasionally",
            "Alcohol": "Never", "Exercise Type": "Cardio", "Diet Quality": "Medium",
            "Sleep Duration": 7, "Stress Score": 4, "Blood Pressure": "130/85",
        });

        let a = run_prediction(&artifacts, &profile(data.clone())).unwrap();
        let b = run_prediction(&artifacts, &profile(data)).unwrap();

        assert_eq!(a.prediction, b.prediction);
        assert_eq!(a.adjustments, b.adjustments);
        assert_eq!(a.summary, b.summary);
    }

    #[test]
    fn blood_pressure_feeds_the_model_not_the_formula() {
        let artifacts = artifacts();
        let with_bp = run_prediction(
            &artifacts,
            &profile(json!({"Age": 40, "Exercise Type": "Gym", "Blood Pressure": "180/120"})),
        )
        .unwrap();
        let without_bp = run_prediction(
            &artifacts,
            &profile(json!({"Age": 40, "Exercise Type": "Gym"})),
        )
        .unwrap();

        // Same formula path either way
        assert_eq!(with_bp.adjustments, without_bp.adjustments);
    }

    #[test]
    fn malformed_blood_pressure_aborts_the_request() {
        let artifacts = artifacts();
        let p = profile(json!({"Age": 40, "Blood Pressure": "not-a-reading"}));
        let err = run_prediction(&artifacts, &p).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn recommendations_are_never_empty() {
        let artifacts = artifacts();
        let clean = run_prediction(
            &artifacts,
            &profile(json!({
                "Age": 30, "Smoking": "Never", "Alcohol": "Never",
                "Exercise Type": "Yoga", "Diet Quality": "High",
            })),
        )
        .unwrap();

        assert_eq!(clean.recommendations.len(), 1);
        assert_eq!(clean.recommendations[0].title, "Keep Up the Great Work!");
    }

    #[test]
    fn response_carries_health_scores_and_status() {
        let artifacts = artifacts();
        let result = run_prediction(
            &artifacts,
            &profile(json!({
                "Age": 40, "Diet Quality": "High", "Exercise Type": "Gym",
                "Sleep Duration": 8, "Stress Score": 3,
                "Smoking": "Never", "Alcohol": "Occasionally",
            })),
        )
        .unwrap();

        assert_eq!(result.status, "success");
        assert_eq!(result.current_age, 40.0);
        assert_eq!(result.health_scores.exercise, 5.0);

        // Wire format uses the dashboard's capitalized keys
        let body = serde_json::to_value(&result).unwrap();
        assert!(body["health_scores"]["Diet"].is_number());
        assert!(body["health_scores"]["Habits"].is_number());
    }

    #[test]
    fn model_correction_is_bounded_before_the_floor() {
        let artifacts = artifacts();
        // Across a spread of profiles, the prediction stays within 5 years
        // of the formula estimate unless the age floor raised it.
        let cases = [
            json!({"Age": 25, "State": "Kerala", "Exercise Type": "Yoga", "Diet Quality": "High"}),
            json!({"Age": 60, "State": "Assam", "Smoking": "Daily", "Exercise Type": "None"}),
            json!({"Age": 45, "Diet Quality": "Medium", "Exercise Type": "Walking"}),
        ];

        for data in cases {
            let p = profile(data);
            let result = run_prediction(&artifacts, &p).unwrap();

            let baseline = rust_lifespan_api::baselines::baseline_for(p.state.as_deref().or(Some("Delhi")));
            let formula = rust_lifespan_api::formula::formula_estimate(
                baseline,
                &rust_lifespan_api::formula::evaluate_adjustments(&p),
            );
            let floor = if p.age < 70.0 { p.age + 8.0 } else { p.age + 4.0 };

            let within_cap = (result.prediction - formula).abs() <= 5.05;
            let floored = (result.prediction - floor).abs() < 0.05;
            assert!(within_cap || floored, "prediction {} vs formula {}", result.prediction, formula);
        }
    }
}
