//! Serving-time decision logic: request fingerprinting and the
//! cache-then-infer orchestration.

pub mod fingerprint;
pub mod service;

pub use fingerprint::{cache_key, KEY_NAMESPACE};
pub use service::{InferenceService, CACHE_TTL_SECS};
