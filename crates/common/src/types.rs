//! Wire types shared across the service.
//!
//! The request schema mirrors the upstream feature table exactly, including
//! the unit-suffixed column aliases for the four weather metrics. Those
//! aliases are load-bearing: the model artifacts key their weights by the
//! same names, and the cache fingerprint is computed over them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single prediction request. All fields are required.
///
/// Two requests with identical field values are the same cache entity,
/// regardless of field order in the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub order_id: i64,
    pub distance_km: f64,
    #[serde(rename = "relative_humidity_2m (%)")]
    pub relative_humidity_2m: f64,
    #[serde(rename = "cloud_cover (%)")]
    pub cloud_cover: f64,
    #[serde(rename = "wind_speed_10m (km/h)")]
    pub wind_speed_10m: f64,
    #[serde(rename = "precipitation (mm)")]
    pub precipitation: f64,
    pub accept_hour_sin: f64,
    pub accept_hour_cos: f64,
    pub accept_dow_sin: f64,
    pub accept_dow_cos: f64,
    #[serde(rename = "Weather_Label")]
    pub weather_label: String,
    #[serde(rename = "Traffic_Label")]
    pub traffic_label: String,
    pub city: String,
    pub aoi_type: i64,
}

/// The prediction result returned to the caller (and cached verbatim).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub order_id: i64,
    pub city: String,
    #[serde(rename = "Predicted_ETA")]
    pub predicted_eta: f64,
    #[serde(rename = "Predicted_Delay")]
    pub predicted_delay: i64,
}

/// A single feature value inside a [`FeatureRow`].
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Number(f64),
    Label(String),
}

/// A single-row tabular input for the model pipelines.
///
/// Keys are the wire aliases (e.g. `"relative_humidity_2m (%)"`), not
/// internal field names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRow {
    values: BTreeMap<String, FeatureValue>,
}

impl FeatureRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FeatureValue) {
        self.values.insert(name.into(), value);
    }

    /// Numeric feature lookup; `None` if absent or non-numeric.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(FeatureValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Categorical feature lookup; `None` if absent or numeric.
    pub fn label(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(FeatureValue::Label(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PredictionRequest {
    /// Assemble the single-row model input, preserving wire aliases.
    pub fn feature_row(&self) -> FeatureRow {
        let mut row = FeatureRow::new();
        row.insert("order_id", FeatureValue::Number(self.order_id as f64));
        row.insert("distance_km", FeatureValue::Number(self.distance_km));
        row.insert(
            "relative_humidity_2m (%)",
            FeatureValue::Number(self.relative_humidity_2m),
        );
        row.insert("cloud_cover (%)", FeatureValue::Number(self.cloud_cover));
        row.insert(
            "wind_speed_10m (km/h)",
            FeatureValue::Number(self.wind_speed_10m),
        );
        row.insert("precipitation (mm)", FeatureValue::Number(self.precipitation));
        row.insert("accept_hour_sin", FeatureValue::Number(self.accept_hour_sin));
        row.insert("accept_hour_cos", FeatureValue::Number(self.accept_hour_cos));
        row.insert("accept_dow_sin", FeatureValue::Number(self.accept_dow_sin));
        row.insert("accept_dow_cos", FeatureValue::Number(self.accept_dow_cos));
        row.insert(
            "Weather_Label",
            FeatureValue::Label(self.weather_label.clone()),
        );
        row.insert(
            "Traffic_Label",
            FeatureValue::Label(self.traffic_label.clone()),
        );
        row.insert("city", FeatureValue::Label(self.city.clone()));
        row.insert("aoi_type", FeatureValue::Number(self.aoi_type as f64));
        row
    }
}
