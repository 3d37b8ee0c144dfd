//! Trained model and label-encoder artifacts.
//!
//! Both artifacts are versioned JSON files produced by the training job and
//! loaded once at process start. They are read-only afterwards, so a single
//! `Arc` is shared across all concurrent requests. A failed load leaves the
//! service degraded but live: `/predict` fails fast with a model-unavailable
//! error instead of crashing the process.

use crate::encoder::EncodedFeatures;
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// File names of the current artifact generation.
pub const MODEL_FILE: &str = "life_expectancy_model_v15.json";
pub const ENCODERS_FILE: &str = "label_encoders_v15.json";

/// A fitted categorical encoder: label -> position in the trained class list.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<&str>) -> Self {
        Self {
            classes: classes.into_iter().map(String::from).collect(),
        }
    }

    /// Numeric code for a label, or `None` when it is outside the vocabulary.
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }

    /// The full accepted-label list, in trained order.
    pub fn known_labels(&self) -> &[String] {
        &self.classes
    }
}

/// Linear regression over the encoded feature columns.
#[derive(Debug, Clone, Deserialize)]
pub struct LifeExpectancyModel {
    pub version: String,
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LifeExpectancyModel {
    /// Raw life-expectancy estimate for an encoded row.
    ///
    /// Columns the row leaves unset contribute zero, matching how the
    /// training pipeline fills absent values.
    pub fn predict(&self, features: &EncodedFeatures) -> f64 {
        self.feature_names
            .iter()
            .zip(&self.coefficients)
            .map(|(name, coef)| coef * features.get(name).unwrap_or(0.0))
            .sum::<f64>()
            + self.intercept
    }
}

/// The model plus its per-field label encoders, loaded together because a
/// model is useless with encoders from a different training run.
#[derive(Debug)]
pub struct ModelArtifacts {
    pub model: LifeExpectancyModel,
    pub encoders: BTreeMap<String, LabelEncoder>,
}

impl ModelArtifacts {
    /// Loads both artifact files from `dir` and cross-checks their shape.
    pub fn load(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref();

        let model_path = dir.join(MODEL_FILE);
        let model_raw = std::fs::read_to_string(&model_path)
            .with_context(|| format!("Failed to read model artifact {}", model_path.display()))?;
        let model: LifeExpectancyModel = serde_json::from_str(&model_raw)
            .with_context(|| format!("Invalid model artifact {}", model_path.display()))?;

        if model.feature_names.len() != model.coefficients.len() {
            anyhow::bail!(
                "Model artifact is inconsistent: {} feature names but {} coefficients",
                model.feature_names.len(),
                model.coefficients.len()
            );
        }

        let encoders_path = dir.join(ENCODERS_FILE);
        let encoders_raw = std::fs::read_to_string(&encoders_path).with_context(|| {
            format!("Failed to read encoder artifact {}", encoders_path.display())
        })?;
        let encoders: BTreeMap<String, LabelEncoder> = serde_json::from_str(&encoders_raw)
            .with_context(|| format!("Invalid encoder artifact {}", encoders_path.display()))?;

        for (field, encoder) in &encoders {
            if encoder.classes.is_empty() {
                anyhow::bail!("Encoder for '{}' has an empty class list", field);
            }
        }

        tracing::info!(
            "Model artifacts loaded: version {}, {} features, {} encoders",
            model.version,
            model.feature_names.len(),
            encoders.len()
        );

        Ok(Self { model, encoders })
    }
}
