//! Shared domain types and the unified error enum for the ETA
//! inference service.

pub mod error;
pub mod types;

pub use error::Error;
pub use types::{FeatureRow, FeatureValue, PredictionRequest, PredictionResponse};
