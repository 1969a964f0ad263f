//! Validated, display-ready structures derived from a provider answer.
//!
//! A [`FeedData`] payload is checked once at the boundary (`AirQualityReading::from_feed`)
//! so that the table builders and the presentation code never deal with absent or
//! mistyped fields.

use crate::error::{AppError, Result};
use crate::models::{FeedData, Forecast, IaqiReading};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;

/// Geographical position of a monitoring station.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// The current air-quality picture of one station. Immutable once created.
#[derive(Debug, Clone)]
pub struct AirQualityReading {
    /// Index as reported. Fractional values are kept so classification sees the exact number.
    pub aqi: f64,
    pub pollutants: BTreeMap<String, IaqiReading>,
    pub station_name: String,
    pub station_url: Option<String>,
    pub coordinates: Coordinates,
    pub dominant_pollutant: Option<String>,
    /// Local observation time including the UTC offset when the provider sends one.
    pub observed_at: Option<String>,
    pub forecast: Option<Forecast>,
    /// Names of the agencies the data comes from.
    pub attributions: Vec<String>,
}

impl AirQualityReading {
    /// Validates a successful feed payload.
    ///
    /// `city` is only used to label a `NoData` error when the station reports `"-"` as its index.
    ///
    /// # Errors
    ///
    /// * `AppError::NoData` if the station currently has no index.
    /// * `AppError::UnexpectedData` if the index is negative or not a number, or if the
    ///   station position is not a `[lat, lon]` pair.
    pub fn from_feed(city: &str, data: FeedData) -> Result<Self> {
        let aqi = parse_aqi(city, &data.aqi)?;

        let coordinates = match data.city.geo.as_slice() {
            [latitude, longitude] => Coordinates {
                latitude: *latitude,
                longitude: *longitude,
            },
            other => {
                return Err(AppError::UnexpectedData(format!(
                    "station position should be [lat, lon], got {} value(s)",
                    other.len()
                )))
            },
        };

        let observed_at = data.time.and_then(|t| match (t.s, t.tz) {
            (Some(s), Some(tz)) => Some(format!("{} {}", s, tz)),
            (s, _) => s,
        });

        let attributions = data
            .attributions
            .into_iter()
            .filter_map(|a| a.name)
            .filter(|name| !name.trim().is_empty())
            .collect();

        Ok(Self {
            aqi,
            pollutants: data.iaqi,
            station_name: data.city.name,
            station_url: data.city.url,
            coordinates,
            dominant_pollutant: data.dominant_pollutant,
            observed_at,
            forecast: data.forecast,
            attributions,
        })
    }
}

fn parse_aqi(city: &str, raw: &Value) -> Result<f64> {
    match raw {
        Value::Number(n) => n
            .as_f64()
            .filter(|v| valid_aqi(*v))
            .ok_or_else(|| AppError::UnexpectedData(format!("AQI out of range: {}", n))),
        Value::String(s) if s.trim() == "-" || s.trim().is_empty() => Err(AppError::NoData {
            city: city.to_string(),
            reason: "station reports no current AQI".to_string(),
        }),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(v) if valid_aqi(v) => Ok(v),
            Ok(_) => Err(AppError::UnexpectedData(format!("AQI out of range: '{}'", s))),
            Err(_) => Err(AppError::UnexpectedData(format!("AQI is not a number: '{}'", s))),
        },
        other => Err(AppError::UnexpectedData(format!(
            "AQI is not a number: {}",
            other
        ))),
    }
}

fn valid_aqi(v: f64) -> bool {
    v.is_finite() && v >= 0.0
}

/// One row of the pollutant table. Only numeric readings become rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PollutantRow {
    pub pollutant: String,
    pub value: f64,
}

/// One day of the trend series.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub average: f64,
}
