//! Model pipeline loading and invocation.
//!
//! Artifacts live at fixed relative paths under the model directory: either
//! two independently serialized heads (`best_regression_pipeline.json` and
//! `best_classification_pipeline.json`) or one combined
//! `best_joint_pipeline.json`. The two layouts produce differently shaped
//! outputs — named vs positional — which is why [`PipelineOutput`] exists.

pub mod artifact;
pub mod output;

use std::path::Path;

use common::{Error, FeatureRow};
use tracing::info;

pub use artifact::{CategoricalWeights, JointArtifact, Link, ModelArtifact};
pub use output::PipelineOutput;

pub const REGRESSION_ARTIFACT: &str = "best_regression_pipeline.json";
pub const CLASSIFICATION_ARTIFACT: &str = "best_classification_pipeline.json";
pub const JOINT_ARTIFACT: &str = "best_joint_pipeline.json";

/// Seam for invoking the loaded pipelines on a single feature row.
///
/// Scoring is synchronous CPU work; the trait exists so the service can be
/// exercised with stub pipelines.
pub trait Predictor: Send + Sync {
    fn predict(&self, row: &FeatureRow) -> Result<PipelineOutput, Error>;
}

/// The trained pipelines, loaded once at startup and immutable thereafter.
#[derive(Debug, Clone)]
pub enum LoadedPipelines {
    /// Two separately serialized heads; outputs are labeled.
    Separate {
        regression: ModelArtifact,
        classification: ModelArtifact,
    },
    /// One combined artifact; outputs are positional (ETA first).
    Joint(JointArtifact),
}

impl Predictor for LoadedPipelines {
    fn predict(&self, row: &FeatureRow) -> Result<PipelineOutput, Error> {
        match self {
            LoadedPipelines::Separate {
                regression,
                classification,
            } => Ok(PipelineOutput::Named {
                eta: regression.predict(row)?,
                delay: classification.predict(row)?,
            }),
            LoadedPipelines::Joint(joint) => Ok(PipelineOutput::Positional(vec![
                joint.eta.predict(row)?,
                joint.delay.predict(row)?,
            ])),
        }
    }
}

/// Load the pipelines from `model_dir`.
///
/// A joint artifact takes precedence when present; otherwise both separate
/// heads are required. Any failure maps to [`Error::ModelLoad`].
pub fn load_pipelines(model_dir: &Path) -> Result<LoadedPipelines, Error> {
    let joint_path = model_dir.join(JOINT_ARTIFACT);
    if joint_path.exists() {
        let joint = JointArtifact::from_path(&joint_path)?;
        info!(
            "Loaded joint pipeline: targets {} + {}",
            joint.eta.target, joint.delay.target
        );
        return Ok(LoadedPipelines::Joint(joint));
    }

    let regression = ModelArtifact::from_path(&model_dir.join(REGRESSION_ARTIFACT))?;
    let classification = ModelArtifact::from_path(&model_dir.join(CLASSIFICATION_ARTIFACT))?;
    info!(
        "Loaded pipelines: regression target {}, classification target {}",
        regression.target, classification.target
    );
    Ok(LoadedPipelines::Separate {
        regression,
        classification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::FeatureValue;

    fn test_row() -> FeatureRow {
        let mut row = FeatureRow::new();
        row.insert("distance_km", FeatureValue::Number(3.0));
        row
    }

    fn eta_head() -> ModelArtifact {
        ModelArtifact::from_json(
            r#"{
                "target": "ETA_Prediction",
                "intercept": 5.0,
                "weights": { "distance_km": 4.0 }
            }"#,
        )
        .unwrap()
    }

    fn delay_head() -> ModelArtifact {
        ModelArtifact::from_json(
            r#"{
                "target": "Delay_Prediction",
                "intercept": -2.0,
                "weights": { "distance_km": 0.5 },
                "link": "logistic"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_separate_pipelines_emit_named_output() {
        let pipelines = LoadedPipelines::Separate {
            regression: eta_head(),
            classification: delay_head(),
        };

        // eta = 5 + 4*3 = 17; delay score = -0.5 → sigmoid < 0.5 → 0
        let output = pipelines.predict(&test_row()).unwrap();
        assert_eq!(
            output,
            PipelineOutput::Named {
                eta: 17.0,
                delay: 0.0
            }
        );
    }

    #[test]
    fn test_joint_pipeline_emits_positional_output() {
        let pipelines = LoadedPipelines::Joint(JointArtifact {
            eta: eta_head(),
            delay: delay_head(),
        });

        let output = pipelines.predict(&test_row()).unwrap();
        assert_eq!(output, PipelineOutput::Positional(vec![17.0, 0.0]));
    }

    #[test]
    fn test_both_layouts_normalize_to_same_response_values() {
        let separate = LoadedPipelines::Separate {
            regression: eta_head(),
            classification: delay_head(),
        };
        let joint = LoadedPipelines::Joint(JointArtifact {
            eta: eta_head(),
            delay: delay_head(),
        });

        let row = test_row();
        let a = separate.predict(&row).unwrap().normalize().unwrap();
        let b = joint.predict(&row).unwrap().normalize().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_load_pipelines_missing_artifacts() {
        let err = load_pipelines(Path::new("no/such/dir")).unwrap_err();
        assert!(matches!(err, Error::ModelLoad(_)));
    }
}
