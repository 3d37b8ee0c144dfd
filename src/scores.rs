//! Per-category 0-5 display scores for the response dashboard.
//!
//! These are diagnostic values only; nothing in the prediction pipeline
//! reads them. A missing or out-of-vocabulary ordinal falls back to the
//! middle of its scale rather than failing the request, and every score is
//! clamped to the documented 0-5 range.

use crate::models::{HealthProfile, HealthScores};

const DIET_SCALE: [&str; 3] = ["Low", "Medium", "High"];
const HABIT_SCALE: [&str; 3] = ["Never", "Occasionally", "Daily"];

/// Position of a value on an ordinal scale, mid-scale when absent or unknown.
fn ordinal(value: Option<&str>, scale: &[&str]) -> f64 {
    value
        .and_then(|v| scale.iter().position(|s| *s == v))
        .unwrap_or(scale.len() / 2) as f64
}

fn clamp_score(score: f64) -> f64 {
    score.clamp(0.0, 5.0)
}

pub fn compute_scores(profile: &HealthProfile) -> HealthScores {
    HealthScores {
        diet: clamp_score(5.0 - ordinal(profile.diet_quality.as_deref(), &DIET_SCALE) * 2.0),
        exercise: if profile.has_exercise() { 5.0 } else { 1.0 },
        sleep: clamp_score(profile.sleep_duration.unwrap_or(0.0) / 9.0 * 5.0),
        stress: clamp_score(6.0 - profile.stress_score.unwrap_or(0.0) / 2.0),
        habits: clamp_score(
            5.0 - ordinal(profile.smoking.as_deref(), &HABIT_SCALE)
                - ordinal(profile.alcohol.as_deref(), &HABIT_SCALE),
        ),
    }
}
