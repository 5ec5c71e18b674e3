//! Unified error type for the ETA inference service.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("model load failed: {0}")]
    ModelLoad(String),

    #[error("model pipelines unavailable")]
    InferenceUnavailable,

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("cache error: {0}")]
    Cache(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
