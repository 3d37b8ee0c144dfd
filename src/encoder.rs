//! Feature encoding: turns a [`HealthProfile`] into the exact numeric column
//! set the trained model was fitted on.
//!
//! The transformation mirrors the training pipeline (v15): raw numerics pass
//! through, the family-history and existing-condition sets expand into 0/1
//! flags, the blood-pressure string splits into systolic/diastolic columns,
//! and every categorical field is replaced by its trained label-encoder code.

use crate::artifacts::LabelEncoder;
use crate::errors::AppError;
use crate::models::{HealthProfile, ALL_EXISTING_CONDITIONS, ALL_FAMILY_HISTORIES};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// The model's input row: column name -> numeric value. Columns the profile
/// left unset are simply absent; inference treats them as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedFeatures {
    columns: HashMap<String, f64>,
}

impl EncodedFeatures {
    pub fn set(&mut self, column: impl Into<String>, value: f64) {
        self.columns.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns.get(column).copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn bp_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*/\s*(\d+(?:\.\d+)?)\s*$").unwrap())
}

/// Splits a "systolic/diastolic" string into its two numeric parts.
///
/// A present but malformed value aborts the request; the model cannot accept
/// a half-parsed pressure column.
pub fn split_blood_pressure(raw: &str) -> Result<(f64, f64), AppError> {
    let caps = bp_pattern().captures(raw).ok_or_else(|| {
        AppError::Validation(format!(
            "Field 'Blood Pressure' must look like '120/80', got '{}'.",
            raw
        ))
    })?;

    // The pattern only matches valid decimal tokens
    let systolic = caps[1].parse::<f64>().map_err(|_| {
        AppError::Validation(format!("Unparsable systolic pressure in '{}'.", raw))
    })?;
    let diastolic = caps[2].parse::<f64>().map_err(|_| {
        AppError::Validation(format!("Unparsable diastolic pressure in '{}'.", raw))
    })?;

    Ok((systolic, diastolic))
}

/// Encodes a profile against the trained label encoders.
///
/// Fails with [`AppError::Encoding`] when a categorical value falls outside
/// its encoder's vocabulary; the error names the offending value and the
/// full accepted-label list. That message shape is a deliberate contract
/// with the frontend, not incidental debug output.
pub fn encode_profile(
    profile: &HealthProfile,
    encoders: &BTreeMap<String, LabelEncoder>,
) -> Result<EncodedFeatures, AppError> {
    let mut features = EncodedFeatures::default();

    let numerics = [
        ("Age", Some(profile.age)),
        ("Height", profile.height),
        ("Weight", profile.weight),
        ("BMI", profile.bmi),
        ("Resting Heart Rate", profile.resting_heart_rate),
        ("SpO2", profile.spo2),
        ("Sleep Duration", profile.sleep_duration),
        ("Daily Activity", profile.daily_activity),
        ("Stress Score", profile.stress_score),
        ("Air Quality Index", profile.air_quality_index),
        ("Work Hours", profile.work_hours),
    ];
    for (column, value) in numerics {
        if let Some(v) = value {
            features.set(column, v);
        }
    }

    // One-hot expansion; the raw list fields are dropped here and never
    // reach the model. Unknown condition strings are ignored.
    for condition in ALL_FAMILY_HISTORIES {
        let flag = profile.family_history.iter().any(|h| h == condition);
        features.set(format!("FamilyHistory_{}", condition), flag as i32 as f64);
    }
    for condition in ALL_EXISTING_CONDITIONS {
        let flag = profile.existing_conditions.iter().any(|c| c == condition);
        features.set(
            format!("ExistingConditions_{}", condition),
            flag as i32 as f64,
        );
    }

    if let Some(ref bp) = profile.blood_pressure {
        let (systolic, diastolic) = split_blood_pressure(bp)?;
        features.set("Systolic_Pressure", systolic);
        features.set("Diastolic_Pressure", diastolic);
    }

    // The sentinel "None" exercise value becomes an absent column, matching
    // the training pipeline's NaN mapping.
    let exercise = profile.exercise_type.as_deref().filter(|e| *e != "None");

    // The region field never reaches the model; it only selects the
    // baseline, so an unknown region is not an encoding failure.
    let categoricals: [(&str, Option<&str>); 5] = [
        ("Gender", profile.gender.as_deref()),
        ("Smoking", profile.smoking.as_deref()),
        ("Alcohol", profile.alcohol.as_deref()),
        ("Diet Quality", profile.diet_quality.as_deref()),
        ("Exercise Type", exercise),
    ];
    for (column, raw_label) in categoricals {
        let Some(label) = raw_label else { continue };
        let Some(encoder) = encoders.get(column) else {
            continue;
        };
        match encoder.encode(label) {
            Some(code) => features.set(column, code as f64),
            None => {
                return Err(AppError::Encoding {
                    field: column.to_string(),
                    value: label.to_string(),
                    accepted: encoder.known_labels().to_vec(),
                })
            }
        }
    }

    Ok(features)
}
