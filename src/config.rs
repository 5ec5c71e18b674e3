//! Server configuration — environment variables with defaults, plus
//! optional `.env` loading.

use std::path::PathBuf;

use common::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_REDIS_HOST: &str = "127.0.0.1";
pub const DEFAULT_REDIS_PORT: u16 = 6379;
pub const DEFAULT_CACHE_OP_TIMEOUT_MS: u64 = 250;
pub const DEFAULT_MODEL_DIR: &str = "models";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    pub redis_host: String,
    pub redis_port: u16,
    /// Bound on every cache call (connect, get, set, ping).
    pub cache_op_timeout_ms: u64,
    /// Directory holding the serialized pipeline artifacts.
    pub model_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            redis_host: DEFAULT_REDIS_HOST.to_string(),
            redis_port: DEFAULT_REDIS_PORT,
            cache_op_timeout_ms: DEFAULT_CACHE_OP_TIMEOUT_MS,
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
        }
    }
}

fn parse_port(raw: &str, env_name: &str) -> Result<u16, Error> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| Error::Config(format!("{env_name} must be a valid port number")))
}

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

/// Load configuration from the environment and an optional `.env` file.
pub fn load_config() -> Result<ServerConfig, Error> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    let mut config = ServerConfig::default();

    if let Ok(raw) = std::env::var("BIND_ADDR") {
        if !raw.trim().is_empty() {
            config.bind_addr = raw.trim().to_string();
        }
    }
    if let Ok(raw) = std::env::var("REDIS_HOST") {
        if !raw.trim().is_empty() {
            config.redis_host = raw.trim().to_string();
        }
    }
    if let Ok(raw) = std::env::var("REDIS_PORT") {
        config.redis_port = parse_port(&raw, "REDIS_PORT")?;
    }
    if let Ok(raw) = std::env::var("CACHE_OP_TIMEOUT_MS") {
        config.cache_op_timeout_ms = parse_positive_u64(&raw, "CACHE_OP_TIMEOUT_MS")?;
    }
    if let Ok(raw) = std::env::var("MODEL_DIR") {
        if !raw.trim().is_empty() {
            config.model_dir = PathBuf::from(raw.trim());
        }
    }

    config.bind_addr.parse::<std::net::SocketAddr>().map_err(|_| {
        Error::Config(format!(
            "BIND_ADDR \"{}\" is not a socket address",
            config.bind_addr
        ))
    })?;

    Ok(config)
}
