//! Pipeline output containers and normalization.
//!
//! Two separately loaded pipelines report their predictions by output name;
//! a joint artifact reports a positional sequence. The response builder must
//! accept either container, so the shape is decoded once here instead of
//! branching ad hoc at the call site.

use common::Error;

/// Raw output of a pipeline invocation, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutput {
    /// Labeled outputs, keyed by prediction name.
    Named { eta: f64, delay: f64 },
    /// Positional outputs: index 0 = ETA, index 1 = delay.
    Positional(Vec<f64>),
}

impl PipelineOutput {
    /// Normalize into `(eta, delay_flag)`.
    ///
    /// ETA stays floating point; the delay output is coerced to a 0/1 flag.
    pub fn normalize(self) -> Result<(f64, i64), Error> {
        let (eta, delay) = match self {
            PipelineOutput::Named { eta, delay } => (eta, delay),
            PipelineOutput::Positional(values) => {
                if values.len() < 2 {
                    return Err(Error::Inference(format!(
                        "positional pipeline output has {} values, expected 2",
                        values.len()
                    )));
                }
                (values[0], values[1])
            }
        };

        if !eta.is_finite() || !delay.is_finite() {
            return Err(Error::Inference(
                "pipeline produced a non-finite prediction".into(),
            ));
        }

        let flag = delay.round().clamp(0.0, 1.0) as i64;
        Ok((eta, flag))
    }
}
