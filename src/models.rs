use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Numeric fields the submission may carry, in the order the training
/// schema expects them. Values arrive as JSON numbers or numeric strings.
pub const NUMERIC_FIELDS: [&str; 11] = [
    "Age",
    "Height",
    "Weight",
    "BMI",
    "Resting Heart Rate",
    "SpO2",
    "Sleep Duration",
    "Daily Activity",
    "Stress Score",
    "Air Quality Index",
    "Work Hours",
];

/// Fixed vocabulary for the family-history one-hot expansion.
pub const ALL_FAMILY_HISTORIES: [&str; 3] = ["Diabetes", "Heart Disease", "Cancer"];

/// Fixed vocabulary for the existing-conditions one-hot expansion.
pub const ALL_EXISTING_CONDITIONS: [&str; 3] = ["Hypertension", "Asthma", "COPD"];

/// A user's health submission, parsed out of the raw JSON document the
/// frontend posts. Field names on the wire are the training schema's
/// ("Age", "Blood Pressure", "Family History", ...).
///
/// Everything except age is optional; the encoder and formula decide how to
/// treat an absent value. The untouched submission is kept in `raw` for the
/// submission log and persistence.
#[derive(Debug, Clone)]
pub struct HealthProfile {
    pub age: f64,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub bmi: Option<f64>,
    pub resting_heart_rate: Option<f64>,
    pub spo2: Option<f64>,
    pub sleep_duration: Option<f64>,
    pub daily_activity: Option<f64>,
    pub stress_score: Option<f64>,
    pub air_quality_index: Option<f64>,
    pub work_hours: Option<f64>,
    pub smoking: Option<String>,
    pub alcohol: Option<String>,
    pub diet_quality: Option<String>,
    pub exercise_type: Option<String>,
    pub blood_pressure: Option<String>,
    pub state: Option<String>,
    pub family_history: Vec<String>,
    pub existing_conditions: Vec<String>,
    pub raw: Value,
}

/// Parse a JSON value that may be a number or a numeric string.
fn to_numeric(field: &str, value: &Value) -> Result<Option<f64>, AppError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s.trim().parse::<f64>().map(Some).map_err(|_| {
            AppError::Validation(format!("Field '{}' must be a number, got '{}'.", field, s))
        }),
        other => Err(AppError::Validation(format!(
            "Field '{}' must be a number, got '{}'.",
            field, other
        ))),
    }
}

fn to_text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn to_text_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

impl HealthProfile {
    /// Builds a profile from the untyped submission document.
    ///
    /// Age is the only hard requirement (the safety net and narrative cannot
    /// run without it). Numeric fields present but unparsable abort the
    /// request with a validation error.
    pub fn from_json(data: &Value) -> Result<Self, AppError> {
        let obj = data
            .as_object()
            .ok_or_else(|| AppError::Validation("Invalid JSON or no data received.".to_string()))?;

        let mut numerics = [None; 11];
        for (i, field) in NUMERIC_FIELDS.iter().enumerate() {
            if let Some(v) = obj.get(*field) {
                numerics[i] = to_numeric(field, v)?;
            }
        }

        let age = numerics[0]
            .ok_or_else(|| AppError::Validation("Missing required field 'Age'.".to_string()))?;
        if age <= 0.0 {
            return Err(AppError::Validation(
                "Field 'Age' must be greater than zero.".to_string(),
            ));
        }

        Ok(Self {
            age,
            gender: to_text(obj.get("Gender")),
            height: numerics[1],
            weight: numerics[2],
            bmi: numerics[3],
            resting_heart_rate: numerics[4],
            spo2: numerics[5],
            sleep_duration: numerics[6],
            daily_activity: numerics[7],
            stress_score: numerics[8],
            air_quality_index: numerics[9],
            work_hours: numerics[10],
            smoking: to_text(obj.get("Smoking")),
            alcohol: to_text(obj.get("Alcohol")),
            diet_quality: to_text(obj.get("Diet Quality")),
            exercise_type: to_text(obj.get("Exercise Type")),
            blood_pressure: to_text(obj.get("Blood Pressure")),
            state: to_text(obj.get("State")),
            family_history: to_text_list(obj.get("Family History")),
            existing_conditions: to_text_list(obj.get("Existing Conditions")),
            raw: data.clone(),
        })
    }

    /// Whether the profile reports any actual exercise. The frontend sends
    /// the sentinel string "None" for sedentary users, which counts as no
    /// exercise just like an absent field.
    pub fn has_exercise(&self) -> bool {
        self.exercise_type.as_deref().is_some_and(|e| e != "None")
    }
}

/// One fired formula rule: which lifestyle factor and its signed year impact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentEntry {
    pub factor: String,
    pub impact: f64,
}

/// An actionable suggestion derived from the profile's risk flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub text: String,
    /// Years the suggestion could add; drives the ranking, omitted from the
    /// body when a rule has no headline number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub potential_gain: Option<f64>,
}

/// Diagnostic 0-5 display scores per lifestyle category. These feed the
/// response dashboard only, never the prediction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScores {
    #[serde(rename = "Diet")]
    pub diet: f64,
    #[serde(rename = "Exercise")]
    pub exercise: f64,
    #[serde(rename = "Sleep")]
    pub sleep: f64,
    #[serde(rename = "Stress")]
    pub stress: f64,
    #[serde(rename = "Habits")]
    pub habits: f64,
}

/// Full response body for a successful prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Final predicted life expectancy, rounded to one decimal.
    pub prediction: f64,
    pub current_age: f64,
    /// Fired formula rules in evaluation order.
    pub adjustments: Vec<AdjustmentEntry>,
    pub health_scores: HealthScores,
    pub summary: String,
    pub recommendations: Vec<Recommendation>,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_numeric_strings() {
        let profile = HealthProfile::from_json(&json!({
            "Age": "35",
            "Height": 170,
            "Sleep Duration": "7.5",
        }))
        .unwrap();

        assert_eq!(profile.age, 35.0);
        assert_eq!(profile.height, Some(170.0));
        assert_eq!(profile.sleep_duration, Some(7.5));
    }

    #[test]
    fn missing_age_is_a_validation_error() {
        let err = HealthProfile::from_json(&json!({"Height": 170})).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("Age"));
    }

    #[test]
    fn garbage_numeric_is_a_validation_error() {
        let err = HealthProfile::from_json(&json!({"Age": 30, "Weight": "heavy"})).unwrap_err();
        assert!(err.to_string().contains("Weight"));
    }

    #[test]
    fn empty_string_numeric_is_treated_as_absent() {
        let profile = HealthProfile::from_json(&json!({"Age": 30, "BMI": ""})).unwrap();
        assert_eq!(profile.bmi, None);
    }

    #[test]
    fn none_exercise_counts_as_no_exercise() {
        let sedentary = HealthProfile::from_json(&json!({"Age": 30, "Exercise Type": "None"}));
        assert!(!sedentary.unwrap().has_exercise());

        let active = HealthProfile::from_json(&json!({"Age": 30, "Exercise Type": "Yoga"}));
        assert!(active.unwrap().has_exercise());

        let absent = HealthProfile::from_json(&json!({"Age": 30}));
        assert!(!absent.unwrap().has_exercise());
    }
}
