//! Short-lived result cache behind a narrow get/set/ping seam.
//!
//! The backend is optional by design: the inference path must keep working
//! when the store is unreachable at startup or at call time. Every operation
//! is best-effort — a failed `get` is a miss, a failed `set` is a no-op, and
//! neither ever propagates to the request.

pub mod redis_store;

use async_trait::async_trait;
use common::Error;

pub use redis_store::RedisStore;

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Best-effort read. Any backend failure degrades to a miss.
    async fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Best-effort write with expiry. Failures are logged and dropped.
    async fn set(&self, key: &str, value: Vec<u8>, ttl_secs: u64);

    /// Connectivity probe for the health endpoint. `Ok(false)` means the
    /// backend answered negatively; `Err` means the probe itself failed.
    async fn ping(&self) -> Result<bool, Error>;
}
