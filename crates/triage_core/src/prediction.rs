//! Prediction payload types returned by the model.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Ward;

/// Binary admission prediction label.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum AdmissionDecision {
    Admit,
    Discharge,
}

/// A structured feature value, which the model reports either numerically
/// or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Number(value) => write!(f, "{}", value),
            FeatureValue::Text(value) => f.write_str(value),
        }
    }
}

/// SHAP-style importance attribution for one structured feature.
///
/// Positive importances push towards admission, negative towards discharge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredFeatureImportance {
    pub feature: String,
    pub value: FeatureValue,
    pub importance: f64,
}

/// LIME-style importance attribution for one word of the triage note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFeatureImportance {
    pub word: String,
    pub importance: f64,
}

/// Audit metrics for one demographic subgroup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessMetric {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

/// Fairness metrics grouped by demographic axis, then subgroup
/// (e.g. `Gender` -> `Female` -> metrics).
pub type FairnessMetrics = BTreeMap<String, BTreeMap<String, FairnessMetric>>;

/// The full prediction record decoded from the model response.
///
/// `suggested_ward` and `estimated_time_to_admission` are produced only by
/// the bed-allocation variant of the model prompt and default to `None`.
///
/// # Examples
///
/// ```
/// use triage_core::{AdmissionDecision, PredictionOutcome};
///
/// let json = r#"{
///     "admissionProbability": 0.85,
///     "prediction": "Admit",
///     "triageNote": "Chest pain on arrival.",
///     "structuredFeatureImportance": [],
///     "textFeatureImportance": [],
///     "fairnessMetrics": {}
/// }"#;
///
/// let outcome: PredictionOutcome = serde_json::from_str(json).unwrap();
/// assert_eq!(outcome.prediction, AdmissionDecision::Admit);
/// assert!(outcome.is_admit());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionOutcome {
    /// Predicted admission probability in `0..=1`.
    pub admission_probability: f64,
    pub prediction: AdmissionDecision,
    /// The triage note the prediction was made from. The model does not
    /// always echo it back, so the service backfills it from the input.
    #[serde(default)]
    pub triage_note: String,
    pub structured_feature_importance: Vec<StructuredFeatureImportance>,
    pub text_feature_importance: Vec<TextFeatureImportance>,
    pub fairness_metrics: FairnessMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_ward: Option<Ward>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time_to_admission: Option<String>,
}

impl PredictionOutcome {
    /// Whether the model predicted admission.
    pub fn is_admit(&self) -> bool {
        self.prediction == AdmissionDecision::Admit
    }
}
