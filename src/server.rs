//! HTTP surface of the inference service.
//!
//! Routes: `POST /predict`, `GET /health`, `GET /cache/health`, `GET /`.
//! Inference failures map to 500 with a `detail` string; cache failures
//! never surface here because the service layer absorbs them.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use common::{PredictionRequest, PredictionResponse};
use inference::InferenceService;
use serde_json::{json, Value};
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<InferenceService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health))
        .route("/cache/health", get(cache_health))
        .route("/", get(root))
        .with_state(state)
}

type ErrorReply = (StatusCode, Json<Value>);

fn detail(status: StatusCode, message: String) -> ErrorReply {
    (status, Json(json!({ "detail": message })))
}

async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<PredictionResponse>, ErrorReply> {
    match state.service.predict(&request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            error!("Inference failed for order {}: {}", request.order_id, e);
            Err(detail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "message": "ETA inference API running" }))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "ETA inference API is running!" }))
}

async fn cache_health(State(state): State<AppState>) -> Result<Json<Value>, ErrorReply> {
    let Some(store) = state.service.cache() else {
        return Err(detail(
            StatusCode::SERVICE_UNAVAILABLE,
            "cache not initialized".into(),
        ));
    };

    match store.ping().await {
        Ok(true) => Ok(Json(json!({ "cache": "connected" }))),
        Ok(false) => Ok(Json(json!({ "cache": "unreachable" }))),
        Err(e) => Err(detail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cache_store::CacheStore;
    use common::{Error, FeatureRow};
    use model_pipeline::{PipelineOutput, Predictor};

    struct FixedPredictor(f64, f64);

    impl Predictor for FixedPredictor {
        fn predict(&self, _row: &FeatureRow) -> Result<PipelineOutput, Error> {
            Ok(PipelineOutput::Named {
                eta: self.0,
                delay: self.1,
            })
        }
    }

    struct FailingPing;

    #[async_trait]
    impl CacheStore for FailingPing {
        async fn get(&self, _key: &str) -> Option<Vec<u8>> {
            None
        }
        async fn set(&self, _key: &str, _value: Vec<u8>, _ttl_secs: u64) {}
        async fn ping(&self) -> Result<bool, Error> {
            Err(Error::Cache("connection refused".into()))
        }
    }

    fn state(
        predictor: Option<Arc<dyn Predictor>>,
        cache: Option<Arc<dyn CacheStore>>,
    ) -> AppState {
        AppState {
            service: Arc::new(InferenceService::new(predictor, cache)),
        }
    }

    fn request() -> PredictionRequest {
        PredictionRequest {
            order_id: 1003,
            distance_km: 2.0,
            relative_humidity_2m: 45.0,
            cloud_cover: 20.0,
            wind_speed_10m: 5.0,
            precipitation: 0.0,
            accept_hour_sin: 0.5,
            accept_hour_cos: -0.87,
            accept_dow_sin: 0.43,
            accept_dow_cos: -0.9,
            weather_label: "Clear".into(),
            traffic_label: "Low".into(),
            city: "yt".into(),
            aoi_type: 1,
        }
    }

    #[tokio::test]
    async fn test_predict_returns_response_body() {
        let state = state(Some(Arc::new(FixedPredictor(15.2, 0.0))), None);
        let Json(body) = predict(State(state), Json(request())).await.unwrap();
        assert_eq!(body.order_id, 1003);
        assert_eq!(body.city, "yt");
        assert_eq!(body.predicted_eta, 15.2);
        assert_eq!(body.predicted_delay, 0);
    }

    #[tokio::test]
    async fn test_predict_without_models_is_500() {
        let state = state(None, None);
        let (status, Json(body)) = predict(State(state), Json(request())).await.unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("unavailable"));
    }

    #[tokio::test]
    async fn test_cache_health_without_store_is_503() {
        let state = state(Some(Arc::new(FixedPredictor(1.0, 0.0))), None);
        let (status, _) = cache_health(State(state)).await.unwrap_err();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_cache_health_ping_failure_is_500() {
        let state = state(
            Some(Arc::new(FixedPredictor(1.0, 0.0))),
            Some(Arc::new(FailingPing)),
        );
        let (status, Json(body)) = cache_health(State(state)).await.unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_health_is_static() {
        let Json(body) = health().await;
        assert_eq!(body["status"], "ok");
    }
}
