//! Data structures for deserializing responses of the World Air Quality Index (WAQI) feed API.
//!
//! The feed endpoint answers with an envelope `{ "status": ..., "data": ... }`. On success
//! `data` is an object described by [`FeedData`]; on failure it is usually a plain string
//! such as `"Unknown station"`. The envelope is therefore decoded first and `data` is only
//! interpreted once the status is known.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Status value the provider uses for a successful answer.
pub const STATUS_OK: &str = "ok";

/// Top-level response envelope of `feed/{city}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEnvelope {
    pub status: String,
    /// Left untyped until `status` has been checked.
    #[serde(default)]
    pub data: Value,
}

impl FeedEnvelope {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Human readable reason for a non-ok answer.
    pub fn failure_reason(&self) -> String {
        match &self.data {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Null => format!("provider status '{}'", self.status),
            other => other.to_string(),
        }
    }
}

/// Payload of a successful feed answer.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedData {
    /// Overall index. Usually an integer, but `"-"` when the station has no current value.
    pub aqi: Value,
    pub city: StationInfo,
    /// Dominant pollutant code (the provider's spelling).
    #[serde(default, rename = "dominentpol")]
    pub dominant_pollutant: Option<String>,
    /// Individual readings keyed by pollutant code (`pm25`, `no2`, `t`, `h`, ...).
    #[serde(default)]
    pub iaqi: BTreeMap<String, IaqiReading>,
    #[serde(default)]
    pub time: Option<ObservationTime>,
    #[serde(default)]
    pub forecast: Option<Forecast>,
    #[serde(default)]
    pub attributions: Vec<Attribution>,
}

/// Monitoring station description.
#[derive(Debug, Clone, Deserialize)]
pub struct StationInfo {
    pub name: String,
    /// `[latitude, longitude]`
    #[serde(default)]
    pub geo: Vec<f64>,
    #[serde(default)]
    pub url: Option<String>,
}

/// One instantaneous reading. The value is kept raw since the provider does not
/// guarantee it is numeric.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IaqiReading {
    #[serde(default)]
    pub v: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservationTime {
    /// Local observation time, e.g. `"2024-01-01 13:00:00"`.
    #[serde(default)]
    pub s: Option<String>,
    /// UTC offset, e.g. `"+05:30"`.
    #[serde(default)]
    pub tz: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Forecast {
    /// Daily series keyed by pollutant code (`pm25`, `pm10`, `o3`, `uvi`).
    #[serde(default)]
    pub daily: BTreeMap<String, Vec<DailyAverage>>,
}

/// One day of a forecast series.
#[allow(dead_code)] // min/max are decoded but only the average is charted
#[derive(Debug, Clone, Deserialize)]
pub struct DailyAverage {
    /// Calendar day as `YYYY-MM-DD`.
    pub day: String,
    pub avg: f64,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize)]
pub struct Attribution {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}
