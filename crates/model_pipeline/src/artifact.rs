//! Serialized model artifacts.
//!
//! A trained pipeline is exported by the offline modeling stage as a JSON
//! artifact: a linear scorer over the feature row with per-level weights for
//! the categorical columns. Weight keys use the wire aliases (e.g.
//! `"relative_humidity_2m (%)"`), matching the request schema exactly.

use std::collections::BTreeMap;
use std::path::Path;

use common::{Error, FeatureRow};
use serde::Deserialize;

/// Output link applied to the raw linear score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Link {
    /// Raw score, used by the regression head (ETA in minutes).
    #[default]
    Identity,
    /// Sigmoid of the score, thresholded into a 0/1 flag.
    Logistic,
}

/// Weights for one categorical column.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoricalWeights {
    /// Per-level weights, keyed by label.
    pub levels: BTreeMap<String, f64>,
    /// Weight applied to labels not seen during training.
    #[serde(default)]
    pub fallback: f64,
}

fn default_threshold() -> f64 {
    0.5
}

/// One trained prediction head.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    /// Output name, e.g. `ETA_Prediction` or `Delay_Prediction`.
    pub target: String,
    pub intercept: f64,
    /// Numeric feature weights, keyed by wire alias.
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
    /// Categorical weight groups, keyed by column name.
    #[serde(default)]
    pub categorical: BTreeMap<String, CategoricalWeights>,
    #[serde(default)]
    pub link: Link,
    /// Decision threshold for the logistic link.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl ModelArtifact {
    /// Load an artifact from disk. Failures map to [`Error::ModelLoad`].
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::ModelLoad(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&contents)
            .map_err(|e| Error::ModelLoad(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json(contents: &str) -> Result<Self, Error> {
        let artifact: ModelArtifact = serde_json::from_str(contents)?;
        Ok(artifact)
    }

    /// Raw link-applied score for a feature row.
    ///
    /// A numeric feature named in `weights` but absent from the row is a
    /// schema mismatch and surfaces as [`Error::Inference`]. An unseen
    /// categorical label scores the group's fallback weight.
    pub fn score(&self, row: &FeatureRow) -> Result<f64, Error> {
        let mut score = self.intercept;

        for (name, weight) in &self.weights {
            let value = row.number(name).ok_or_else(|| {
                Error::Inference(format!("missing numeric feature \"{}\"", name))
            })?;
            score += weight * value;
        }

        for (name, group) in &self.categorical {
            let label = row.label(name).ok_or_else(|| {
                Error::Inference(format!("missing categorical feature \"{}\"", name))
            })?;
            score += group.levels.get(label).copied().unwrap_or(group.fallback);
        }

        match self.link {
            Link::Identity => Ok(score),
            Link::Logistic => Ok(1.0 / (1.0 + (-score).exp())),
        }
    }

    /// Final prediction: the score itself for identity, the thresholded
    /// 0/1 flag for logistic.
    pub fn predict(&self, row: &FeatureRow) -> Result<f64, Error> {
        let score = self.score(row)?;
        match self.link {
            Link::Identity => Ok(score),
            Link::Logistic => Ok(if score >= self.threshold { 1.0 } else { 0.0 }),
        }
    }
}

/// A joint artifact carrying both prediction heads in one file.
#[derive(Debug, Clone, Deserialize)]
pub struct JointArtifact {
    pub eta: ModelArtifact,
    pub delay: ModelArtifact,
}

impl JointArtifact {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::ModelLoad(format!("{}: {}", path.display(), e)))?;
        let artifact: JointArtifact = serde_json::from_str(&contents)
            .map_err(|e| Error::ModelLoad(format!("{}: {}", path.display(), e)))?;
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::FeatureValue;

    fn regression_json() -> &'static str {
        r#"{
            "target": "ETA_Prediction",
            "intercept": 10.0,
            "weights": { "distance_km": 2.5, "precipitation (mm)": 1.5 },
            "categorical": {
                "Traffic_Label": {
                    "levels": { "Low": -2.0, "High": 6.0 },
                    "fallback": 1.0
                }
            }
        }"#
    }

    fn classification_json() -> &'static str {
        r#"{
            "target": "Delay_Prediction",
            "intercept": -1.0,
            "weights": { "distance_km": 0.4 },
            "link": "logistic",
            "threshold": 0.5
        }"#
    }

    fn row(distance: f64, precip: f64, traffic: &str) -> FeatureRow {
        let mut row = FeatureRow::new();
        row.insert("distance_km", FeatureValue::Number(distance));
        row.insert("precipitation (mm)", FeatureValue::Number(precip));
        row.insert("Traffic_Label", FeatureValue::Label(traffic.into()));
        row
    }

    #[test]
    fn test_regression_score_is_linear() {
        let artifact = ModelArtifact::from_json(regression_json()).unwrap();
        assert_eq!(artifact.target, "ETA_Prediction");
        assert_eq!(artifact.link, Link::Identity);

        // 10.0 + 2.5*4.0 + 1.5*2.0 + (-2.0) = 21.0
        let eta = artifact.predict(&row(4.0, 2.0, "Low")).unwrap();
        assert!((eta - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_label_scores_fallback() {
        let artifact = ModelArtifact::from_json(regression_json()).unwrap();
        // 10.0 + 2.5*4.0 + 1.5*2.0 + 1.0 = 24.0
        let eta = artifact.predict(&row(4.0, 2.0, "Gridlock")).unwrap();
        assert!((eta - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_numeric_feature_is_schema_mismatch() {
        let artifact = ModelArtifact::from_json(regression_json()).unwrap();
        let mut row = FeatureRow::new();
        row.insert("distance_km", FeatureValue::Number(4.0));
        row.insert("Traffic_Label", FeatureValue::Label("Low".into()));

        let err = artifact.predict(&row).unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
        assert!(err.to_string().contains("precipitation (mm)"));
    }

    #[test]
    fn test_logistic_prediction_thresholds_to_flag() {
        let artifact = ModelArtifact::from_json(classification_json()).unwrap();

        // score = -1.0 + 0.4*10.0 = 3.0 → sigmoid ≈ 0.95 → delayed
        let delayed = artifact.predict(&row(10.0, 0.0, "Low")).unwrap();
        assert_eq!(delayed, 1.0);

        // score = -1.0 + 0.4*1.0 = -0.6 → sigmoid ≈ 0.35 → on time
        let on_time = artifact.predict(&row(1.0, 0.0, "Low")).unwrap();
        assert_eq!(on_time, 0.0);
    }

    #[test]
    fn test_load_failure_maps_to_model_load() {
        let err = ModelArtifact::from_path(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, Error::ModelLoad(_)));
    }
}
