//! Request-time inference orchestration.
//!
//! The per-request flow: fingerprint → cache lookup → (hit: return cached
//! response verbatim) or (miss: assemble the feature row, invoke both
//! pipelines, normalize the output, populate the cache, return). Cache
//! failures degrade; pipeline failures surface.

use std::sync::Arc;

use cache_store::CacheStore;
use common::{Error, PredictionRequest, PredictionResponse};
use model_pipeline::Predictor;
use tracing::{debug, info, warn};

use crate::fingerprint::cache_key;

/// Fixed lifetime of a cached prediction. Expiry is the only removal path.
pub const CACHE_TTL_SECS: u64 = 300;

/// The serving core: loaded pipelines plus an optional cache handle.
///
/// Both collaborators are constructed once at process start and injected; a
/// `None` predictor means model loading failed and every request is
/// rejected, a `None` cache means every request is a miss.
pub struct InferenceService {
    predictor: Option<Arc<dyn Predictor>>,
    cache: Option<Arc<dyn CacheStore>>,
    ttl_secs: u64,
}

impl InferenceService {
    pub fn new(
        predictor: Option<Arc<dyn Predictor>>,
        cache: Option<Arc<dyn CacheStore>>,
    ) -> Self {
        Self {
            predictor,
            cache,
            ttl_secs: CACHE_TTL_SECS,
        }
    }

    /// True once model artifacts were loaded successfully at startup.
    pub fn models_loaded(&self) -> bool {
        self.predictor.is_some()
    }

    /// The cache handle, if one was established at startup.
    pub fn cache(&self) -> Option<&Arc<dyn CacheStore>> {
        self.cache.as_ref()
    }

    /// Serve one prediction request.
    pub async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, Error> {
        let predictor = self
            .predictor
            .as_ref()
            .ok_or(Error::InferenceUnavailable)?;

        let key = cache_key(request)?;

        if let Some(store) = &self.cache {
            if let Some(bytes) = store.get(&key).await {
                match serde_json::from_slice::<PredictionResponse>(&bytes) {
                    Ok(response) => {
                        debug!("Cache hit for {}", key);
                        return Ok(response);
                    }
                    Err(e) => {
                        // Treat an undeserializable entry as a miss; the
                        // fresh response below overwrites it.
                        warn!("Corrupt cache entry at {}: {}", key, e);
                    }
                }
            }
        }

        info!("Cache miss, running inference for order {}", request.order_id);
        let row = request.feature_row();
        let (eta, delay) = predictor.predict(&row)?.normalize()?;

        let response = PredictionResponse {
            order_id: request.order_id,
            city: request.city.clone(),
            predicted_eta: eta,
            predicted_delay: delay,
        };

        // Fire-and-forget population: a failed write must not fail the
        // request, and the adapter already absorbs backend errors.
        if let Some(store) = &self.cache {
            match serde_json::to_vec(&response) {
                Ok(bytes) => store.set(&key, bytes, self.ttl_secs).await,
                Err(e) => warn!("Failed to serialize response for cache: {}", e),
            }
        }

        Ok(response)
    }
}
