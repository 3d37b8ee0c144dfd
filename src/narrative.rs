//! Natural-language summary of the prediction against the regional baseline.
//!
//! Exactly one of four branches fires per prediction: already past the
//! baseline, under-performing it by more than a year, outperforming it by
//! more than a year, or within a year of it.

use crate::models::AdjustmentEntry;

/// Strips the leading article the rule table bakes into diet factor names
/// ("a High Quality Diet" reads badly inside a factor list).
fn strip_article(factor: &str) -> &str {
    factor
        .strip_prefix("a ")
        .or_else(|| factor.strip_prefix("an "))
        .unwrap_or(factor)
}

fn join_factors<'a>(adjustments: &'a [AdjustmentEntry], negative: bool) -> Option<String> {
    let names: Vec<&str> = adjustments
        .iter()
        .filter(|a| if negative { a.impact < 0.0 } else { a.impact > 0.0 })
        .map(|a| strip_article(&a.factor))
        .collect();

    if names.is_empty() {
        None
    } else {
        Some(names.join(", and "))
    }
}

/// Builds the prose summary for a finished prediction.
///
/// `prediction` is the final (post-floor) value; the gap attribution uses the
/// fired adjustments, not the reconciled numbers.
pub fn build_summary(
    prediction: f64,
    current_age: f64,
    baseline: f64,
    region: &str,
    adjustments: &[AdjustmentEntry],
) -> String {
    let difference_from_avg = prediction - baseline;
    let years_from_current = prediction - current_age;

    if current_age > baseline {
        return format!(
            "Congratulations! You have already surpassed the average life expectancy of {:.1} years in {}. \
             Based on your current lifestyle, you are on track to live up to {:.1} years, \
             which is {:.1} more years than the average and about {:.1} years from your current age.",
            baseline, region, prediction, difference_from_avg, years_from_current
        );
    }

    let summary_start = format!(
        "Based on your location in {}, the average life expectancy is around {:.1} years. ",
        region, baseline
    );

    if difference_from_avg < -1.0 {
        let factor_clause = join_factors(adjustments, true)
            .map(|names| format!(" primarily due to factors like {}", names))
            .unwrap_or_default();
        format!(
            "{}You are on track to live {:.1} fewer years than the average{}.",
            summary_start,
            difference_from_avg.abs(),
            factor_clause
        )
    } else if difference_from_avg > 1.0 {
        let factor_clause = join_factors(adjustments, false)
            .map(|names| format!(" This is largely thanks to positive choices like {}.", names))
            .unwrap_or_default();
        format!(
            "{}You are on track to live {:.1} more years than the average.{}",
            summary_start, difference_from_avg, factor_clause
        )
    } else {
        format!(
            "{}Your predicted life expectancy of {:.1} years is in line with the regional average.",
            summary_start, prediction
        )
    }
}
