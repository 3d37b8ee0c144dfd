//! Regional average life-expectancy lookup.
//!
//! Static table matching training data v15. The baseline anchors the formula
//! estimate and the narrative comparison; it is immutable process-wide data,
//! safe for any number of concurrent readers.

/// Default baseline when the submitted region is unknown.
pub const DEFAULT_BASELINE: f64 = 72.0;

/// State name -> average life expectancy (years).
const STATE_BASELINES: [(&str, f64); 29] = [
    ("Andhra Pradesh", 70.0),
    ("Arunachal Pradesh", 70.3),
    ("Assam", 67.2),
    ("Bihar", 69.5),
    ("Chhattisgarh", 68.9),
    ("Goa", 74.5),
    ("Gujarat", 72.8),
    ("Haryana", 72.3),
    ("Himachal Pradesh", 74.6),
    ("Jharkhand", 69.4),
    ("Karnataka", 72.8),
    ("Kerala", 77.8),
    ("Madhya Pradesh", 69.4),
    ("Maharashtra", 73.6),
    ("Manipur", 75.0),
    ("Meghalaya", 72.7),
    ("Mizoram", 74.3),
    ("Nagaland", 73.4),
    ("Odisha", 69.8),
    ("Punjab", 74.4),
    ("Rajasthan", 70.8),
    ("Sikkim", 73.5),
    ("Tamil Nadu", 73.8),
    ("Telangana", 72.7),
    ("Tripura", 74.6),
    ("Uttar Pradesh", 68.7),
    ("Uttarakhand", 73.5),
    ("West Bengal", 72.8),
    ("Delhi", 75.3),
];

/// Looks up the average life expectancy for a region, falling back to
/// [`DEFAULT_BASELINE`] when the region is unknown or absent.
pub fn baseline_for(region: Option<&str>) -> f64 {
    region
        .and_then(|name| {
            STATE_BASELINES
                .iter()
                .find(|(state, _)| *state == name)
                .map(|(_, avg_le)| *avg_le)
        })
        .unwrap_or(DEFAULT_BASELINE)
}
