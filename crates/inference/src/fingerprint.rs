//! Deterministic request fingerprinting for cache keys.
//!
//! The fingerprint must be a pure function of the request's field values:
//! two logically identical requests have to land on the same cache entry no
//! matter how their serialized forms order the fields. Canonicalization is
//! therefore sort-keys-then-digest, not digest-as-received.

use std::collections::BTreeMap;

use common::{Error, PredictionRequest};
use sha2::{Digest, Sha256};

/// Namespace tag partitioning this key family within a shared store.
pub const KEY_NAMESPACE: &str = "inference:";

/// Compute the cache key for a request.
///
/// The field mapping is serialized with lexicographically sorted keys,
/// digested with SHA-256, and rendered as lowercase hex under the
/// [`KEY_NAMESPACE`] prefix.
pub fn cache_key(request: &PredictionRequest) -> Result<String, Error> {
    let value = serde_json::to_value(request)?;
    let serde_json::Value::Object(fields) = value else {
        return Err(Error::Inference(
            "request did not serialize to a field mapping".into(),
        ));
    };

    let canonical: BTreeMap<String, serde_json::Value> = fields.into_iter().collect();
    let bytes = serde_json::to_vec(&canonical)?;
    Ok(format!("{}{:x}", KEY_NAMESPACE, Sha256::digest(&bytes)))
}
