//! The full prediction workflow.
//!
//! Orchestrates one request end to end:
//! 1. Encode the profile into the model's feature schema
//! 2. Compute the formula estimate from the regional baseline
//! 3. Invoke the trained model on the encoded row
//! 4. Reconcile model and formula into a tuned prediction
//! 5. Apply the age-floor safety net
//! 6. Build the narrative, recommendations, and health scores
//!
//! Everything here is synchronous and request-scoped; the shared artifacts
//! are read-only.

use crate::artifacts::ModelArtifacts;
use crate::baselines::baseline_for;
use crate::encoder::encode_profile;
use crate::errors::AppError;
use crate::formula::{evaluate_adjustments, formula_estimate};
use crate::models::{HealthProfile, PredictionResponse};
use crate::narrative::build_summary;
use crate::recommendations::generate_recommendations;
use crate::scores::compute_scores;

/// Fraction of the model/formula discrepancy the model is allowed to apply.
pub const MODEL_INFLUENCE: f64 = 0.2;

/// Hard cap on the model's correction, in years either direction.
pub const MODEL_CORRECTION_CAP: f64 = 5.0;

/// Blends the model's raw prediction with the formula estimate.
///
/// The model may be noisy or out-of-distribution on unusual inputs, so its
/// influence is dampened to 20% of the raw discrepancy and capped at five
/// years either way. The formula stays the dominant signal.
pub fn reconcile(model_raw: f64, formula_le: f64) -> f64 {
    let delta = ((model_raw - formula_le) * MODEL_INFLUENCE)
        .clamp(-MODEL_CORRECTION_CAP, MODEL_CORRECTION_CAP);
    formula_le + delta
}

/// Enforces a minimum plausible remaining lifespan.
///
/// A living person is never predicted fewer than eight remaining years under
/// 70, or four remaining years at 70 and above, no matter how poorly the
/// model and formula scored their inputs.
pub fn apply_age_floor(prediction: f64, current_age: f64) -> f64 {
    if current_age < 70.0 && prediction - current_age < 8.0 {
        current_age + 8.0
    } else if current_age >= 70.0 && prediction - current_age < 4.0 {
        current_age + 4.0
    } else {
        prediction
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Runs the whole pipeline for one profile.
pub fn run_prediction(
    artifacts: &ModelArtifacts,
    profile: &HealthProfile,
) -> Result<PredictionResponse, AppError> {
    tracing::debug!("Step 1: Encoding profile into model feature schema");
    let features = encode_profile(profile, &artifacts.encoders)?;

    // Absent region falls back to Delhi, matching the training frontend's
    // default; an unknown region name falls back to the 72.0 default baseline.
    let region = profile.state.as_deref().unwrap_or("Delhi");
    let baseline = baseline_for(Some(region));

    tracing::debug!("Step 2: Evaluating lifestyle rule table (baseline {:.1})", baseline);
    let adjustments = evaluate_adjustments(profile);
    let formula_le = formula_estimate(baseline, &adjustments);

    tracing::debug!("Step 3: Invoking trained model on {} encoded columns", features.len());
    let model_raw = artifacts.model.predict(&features);

    tracing::debug!(
        "Step 4: Reconciling model ({:.2}) with formula ({:.2})",
        model_raw,
        formula_le
    );
    let tuned = reconcile(model_raw, formula_le);

    let final_prediction = apply_age_floor(tuned, profile.age);
    if final_prediction > tuned {
        tracing::info!(
            "Age floor raised prediction from {:.2} to {:.2} (age {})",
            tuned,
            final_prediction,
            profile.age
        );
    }

    let summary = build_summary(
        final_prediction,
        profile.age,
        baseline,
        region,
        &adjustments,
    );
    let recommendations = generate_recommendations(profile);
    let health_scores = compute_scores(profile);

    Ok(PredictionResponse {
        prediction: round_one_decimal(final_prediction),
        current_age: profile.age,
        adjustments,
        health_scores,
        summary,
        recommendations,
        status: "success".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconcile_dampens_the_discrepancy() {
        // 10-year gap -> 2-year correction
        assert!((reconcile(90.0, 80.0) - 82.0).abs() < 1e-9);
        assert!((reconcile(70.0, 80.0) - 78.0).abs() < 1e-9);
    }

    #[test]
    fn reconcile_caps_the_correction_at_five_years() {
        // 40-year gap would mean an 8-year correction; capped at 5
        assert!((reconcile(120.0, 80.0) - 85.0).abs() < 1e-9);
        assert!((reconcile(40.0, 80.0) - 75.0).abs() < 1e-9);
    }

    #[test]
    fn reconcile_is_identity_when_model_agrees() {
        assert!((reconcile(80.0, 80.0) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn age_floor_under_seventy_guarantees_eight_years() {
        assert_eq!(apply_age_floor(54.3, 55.0), 63.0);
        assert_eq!(apply_age_floor(60.0, 55.0), 63.0);
        // Not binding when remaining years suffice
        assert_eq!(apply_age_floor(80.0, 55.0), 80.0);
    }

    #[test]
    fn age_floor_at_seventy_and_above_guarantees_four_years() {
        assert_eq!(apply_age_floor(71.0, 70.0), 74.0);
        assert_eq!(apply_age_floor(72.0, 75.0), 79.0);
        assert_eq!(apply_age_floor(85.0, 75.0), 85.0);
    }

    #[test]
    fn age_floor_boundary_at_exactly_seventy_uses_four_year_rule() {
        // 70 + 4 = 74, not 70 + 8
        assert_eq!(apply_age_floor(50.0, 70.0), 74.0);
    }

    #[test]
    fn rounding_is_one_decimal() {
        assert_eq!(round_one_decimal(87.25), 87.3);
        assert_eq!(round_one_decimal(63.04), 63.0);
    }
}
