//! Rule-driven recommendation engine.
//!
//! Each trigger is independent and every matching one is included. When
//! nothing fires the engine emits exactly one encouragement entry, so the
//! list is never empty. Ranking is a stable descending sort on the optional
//! potential-gain field; entries without a headline number sort as zero and
//! therefore keep their rule-evaluation order.

use crate::models::{HealthProfile, Recommendation};

fn recommendation(title: &str, text: &str, potential_gain: Option<f64>) -> Recommendation {
    Recommendation {
        title: title.to_string(),
        text: text.to_string(),
        potential_gain,
    }
}

/// Derives the ranked recommendation list from the profile's risk flags.
pub fn generate_recommendations(profile: &HealthProfile) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if matches!(
        profile.smoking.as_deref(),
        Some("Daily") | Some("Occasionally")
    ) {
        recommendations.push(recommendation(
            "Address Smoking Habit",
            "Quitting smoking is the single most impactful change you can make. \
             It could potentially add up to <strong>7 years</strong> to your life expectancy.",
            Some(7.0),
        ));
    }

    if profile.diet_quality.as_deref() == Some("Low") {
        recommendations.push(recommendation(
            "Improve Your Diet Quality",
            "Improving your diet by reducing junk food and sugar could shift \
             your life expectancy by up to <strong>12 years</strong>.",
            Some(12.0),
        ));
    }

    if !profile.has_exercise() && profile.exercise_type.is_some() {
        recommendations.push(recommendation(
            "Introduce Regular Exercise",
            "Incorporating regular activity could extend your lifespan by up to \
             <strong>9 years</strong> compared to being sedentary.",
            Some(9.0),
        ));
    }

    if profile.family_history.iter().any(|h| h == "Heart Disease")
        || profile.existing_conditions.iter().any(|c| c == "Hypertension")
    {
        recommendations.push(recommendation(
            "Focus on Cardiovascular Health",
            "With a predisposition to heart-related issues, focusing on a \
             heart-healthy diet low in sodium and saturated fats is highly recommended.",
            None,
        ));
    }

    if recommendations.is_empty() {
        recommendations.push(recommendation(
            "Keep Up the Great Work!",
            "Your current lifestyle choices are setting you up for a long, healthy life. \
             Continue to focus on a balanced diet, regular exercise, and stress management. \
             Consider regular health check-ups to stay proactive.",
            None,
        ));
    }

    // Stable sort keeps rule order among entries without a gain figure
    recommendations.sort_by(|a, b| {
        let gain_a = a.potential_gain.unwrap_or(0.0);
        let gain_b = b.potential_gain.unwrap_or(0.0);
        gain_b.total_cmp(&gain_a)
    });

    recommendations
}
