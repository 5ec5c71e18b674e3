//! Redis-backed cache store.
//!
//! Uses a single multiplexed connection, which is safe for concurrent use
//! by all in-flight requests. Every operation carries a bounded timeout so a
//! hung backend degrades instead of stalling the request.

use std::time::Duration;

use async_trait::async_trait;
use common::Error;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::CacheStore;

#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
    op_timeout: Duration,
}

impl RedisStore {
    /// Connect and verify the backend answers a ping.
    ///
    /// Connection failures surface as [`Error::Cache`]; the caller decides
    /// whether to run without a cache.
    pub async fn connect(host: &str, port: u16, op_timeout: Duration) -> Result<Self, Error> {
        let url = format!("redis://{}:{}/", host, port);
        let client = redis::Client::open(url).map_err(|e| Error::Cache(e.to_string()))?;

        let conn = timeout(op_timeout, client.get_multiplexed_tokio_connection())
            .await
            .map_err(|_| Error::Cache(format!("connect to {}:{} timed out", host, port)))?
            .map_err(|e| Error::Cache(e.to_string()))?;

        let store = Self { conn, op_timeout };
        match store.ping().await {
            Ok(true) => Ok(store),
            Ok(false) => Err(Error::Cache("ping was not answered".into())),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut conn = self.conn.clone();
        match timeout(self.op_timeout, conn.get::<_, Option<Vec<u8>>>(key)).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                warn!("Cache get failed for {}: {}", key, e);
                None
            }
            Err(_) => {
                warn!("Cache get timed out for {}", key);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl_secs: u64) {
        let mut conn = self.conn.clone();
        match timeout(
            self.op_timeout,
            conn.set_ex::<_, _, ()>(key, value, ttl_secs),
        )
        .await
        {
            Ok(Ok(())) => debug!("Cached {} for {}s", key, ttl_secs),
            Ok(Err(e)) => warn!("Cache set failed for {}: {}", key, e),
            Err(_) => warn!("Cache set timed out for {}", key),
        }
    }

    async fn ping(&self) -> Result<bool, Error> {
        let mut conn = self.conn.clone();
        let reply = timeout(
            self.op_timeout,
            redis::cmd("PING").query_async::<_, String>(&mut conn),
        )
        .await
        .map_err(|_| Error::Cache("ping timed out".into()))?
        .map_err(|e| Error::Cache(e.to_string()))?;
        Ok(reply == "PONG")
    }
}
