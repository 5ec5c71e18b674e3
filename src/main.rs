//! eta-server: delivery ETA inference API.
//!
//! Single-binary Tokio application that:
//! 1. Loads the trained regression and classification pipelines
//! 2. Connects to the Redis result cache (best-effort)
//! 3. Serves predictions over HTTP with a 300-second result cache

mod config;
mod server;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};

use cache_store::{CacheStore, RedisStore};
use inference::InferenceService;
use model_pipeline::Predictor;
use server::AppState;

/// Delivery ETA inference API
#[derive(Parser)]
#[command(name = "eta-server", about = "Delivery ETA inference API")]
struct Cli {
    /// Load the model artifacts, report what was found, then exit.
    #[arg(long)]
    check_models: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "eta_server=info,inference=info,cache_store=info,model_pipeline=info".into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    info!("🚚 ETA inference server starting up...");

    // Load configuration.
    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    info!("Model dir: {}", cfg.model_dir.display());
    info!(
        "Cache: {}:{} (op timeout {}ms)",
        cfg.redis_host, cfg.redis_port, cfg.cache_op_timeout_ms
    );

    // ── Check-models mode ────────────────────────────────────────────
    if cli.check_models {
        match model_pipeline::load_pipelines(&cfg.model_dir) {
            Ok(_) => {
                info!("✅ Model artifacts load cleanly");
                return;
            }
            Err(e) => {
                error!("❌ Model check failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    // ── Model pipelines ──────────────────────────────────────────────
    // A load failure leaves the service up but rejecting inference; it
    // never crashes the process.
    let predictor: Option<Arc<dyn Predictor>> =
        match model_pipeline::load_pipelines(&cfg.model_dir) {
            Ok(pipelines) => {
                info!("✅ Models loaded successfully");
                Some(Arc::new(pipelines))
            }
            Err(e) => {
                error!("❌ Failed to load models: {}", e);
                None
            }
        };

    // ── Cache connection ─────────────────────────────────────────────
    // Best-effort: absence persists for the process lifetime and every
    // request simply misses.
    let cache: Option<Arc<dyn CacheStore>> = match RedisStore::connect(
        &cfg.redis_host,
        cfg.redis_port,
        Duration::from_millis(cfg.cache_op_timeout_ms),
    )
    .await
    {
        Ok(store) => {
            info!("🔗 Connected to cache at {}:{}", cfg.redis_host, cfg.redis_port);
            Some(Arc::new(store))
        }
        Err(e) => {
            warn!("⚠️ Cache not available: {}", e);
            None
        }
    };

    match (predictor.is_some(), cache.is_some()) {
        (true, true) => info!("Service state: ready"),
        (true, false) => warn!("Service state: degraded (no cache)"),
        (false, _) => error!("Service state: unavailable (models missing)"),
    }

    let service = Arc::new(InferenceService::new(predictor, cache));
    let app = server::router(AppState { service });

    let listener = match tokio::net::TcpListener::bind(&cfg.bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind {}: {}", cfg.bind_addr, e);
            std::process::exit(1);
        }
    };
    info!("🚀 Listening on {}", cfg.bind_addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("ETA inference server shut down.");
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}
