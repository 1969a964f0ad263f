//! Reshapes provider readings into the row-oriented tables the charts are drawn from.

use crate::error::{AppError, Result};
use crate::models::{DailyAverage, Forecast, IaqiReading, PollutantRow, TrendPoint};
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Forecast series used as the daily pollution indicator.
pub const TREND_POLLUTANT: &str = "pm25";

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Builds the pollutant table from the per-pollutant readings.
///
/// Rows follow the key order of `readings`. Readings whose value is absent or cannot be
/// coerced to a finite number are dropped. An empty map yields an empty table.
pub fn build_pollutant_table(readings: &BTreeMap<String, IaqiReading>) -> Vec<PollutantRow> {
    let rows: Vec<PollutantRow> = readings
        .iter()
        .filter_map(|(code, reading)| match reading.v.as_ref().and_then(coerce_numeric) {
            Some(value) => Some(PollutantRow {
                pollutant: code.clone(),
                value,
            }),
            None => {
                warn!("Dropping non-numeric reading for '{}': {:?}", code, reading.v);
                None
            },
        })
        .collect();

    debug!(
        "Built pollutant table with {} of {} readings",
        rows.len(),
        readings.len()
    );
    rows
}

/// Numeric coercion: numbers and numeric strings pass, everything else is invalid.
fn coerce_numeric(raw: &Value) -> Option<f64> {
    let value = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// Builds the trend table from a daily forecast series, keeping the source order.
///
/// # Errors
///
/// Returns `AppError::UnexpectedData` if any day is not a `YYYY-MM-DD` date. No partial
/// table is produced in that case.
pub fn build_trend_table(series: &[DailyAverage]) -> Result<Vec<TrendPoint>> {
    series
        .iter()
        .map(|entry| {
            let date = NaiveDate::parse_from_str(entry.day.trim(), DAY_FORMAT).map_err(|e| {
                AppError::UnexpectedData(format!("invalid forecast day '{}': {}", entry.day, e))
            })?;
            Ok(TrendPoint {
                date,
                average: entry.avg,
            })
        })
        .collect()
}

/// Builds the trend table from the forecast's PM2.5 series.
///
/// `Ok(None)` when the forecast or its PM2.5 series is missing: there is no trend to show.
pub fn trend_from_forecast(forecast: Option<&Forecast>) -> Result<Option<Vec<TrendPoint>>> {
    match forecast.and_then(|f| f.daily.get(TREND_POLLUTANT)) {
        Some(series) => build_trend_table(series).map(Some),
        None => {
            debug!("No '{}' forecast series in response", TREND_POLLUTANT);
            Ok(None)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn readings(value: Value) -> BTreeMap<String, IaqiReading> {
        serde_json::from_value(value).unwrap()
    }

    fn series(value: Value) -> Vec<DailyAverage> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_pollutant_table_drops_non_numeric() {
        let rows = build_pollutant_table(&readings(json!({
            "pm25": {"v": 42},
            "co": {"v": "bad"}
        })));
        assert_eq!(
            rows,
            vec![PollutantRow {
                pollutant: "pm25".to_string(),
                value: 42.0
            }]
        );
    }

    #[test]
    fn test_pollutant_table_empty_input() {
        assert!(build_pollutant_table(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_pollutant_table_coerces_numeric_strings_and_drops_missing() {
        let rows = build_pollutant_table(&readings(json!({
            "no2": {"v": " 12.5 "},
            "o3": {},
            "so2": {"v": null},
            "t": {"v": -3.2},
            "w": {"v": true}
        })));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].pollutant, "no2");
        assert_eq!(rows[0].value, 12.5);
        assert_eq!(rows[1].pollutant, "t");
        assert_eq!(rows[1].value, -3.2);
    }

    #[test]
    fn test_pollutant_table_drops_non_finite_strings() {
        let rows = build_pollutant_table(&readings(json!({
            "pm10": {"v": "NaN"},
            "pm25": {"v": "inf"}
        })));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_trend_table_parses_dates_in_order() {
        let points = build_trend_table(&series(json!([
            {"day": "2024-01-01", "avg": 10},
            {"day": "2024-01-02", "avg": 15}
        ])))
        .unwrap();

        assert_eq!(points.len(), 2);
        assert!(points[0].date < points[1].date);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(points[0].average, 10.0);
        assert_eq!(points[1].average, 15.0);
    }

    #[test]
    fn test_trend_table_keeps_source_order() {
        let points = build_trend_table(&series(json!([
            {"day": "2024-01-03", "avg": 1},
            {"day": "2024-01-01", "avg": 2}
        ])))
        .unwrap();
        assert!(points[0].date > points[1].date);
    }

    #[test]
    fn test_trend_table_fails_on_malformed_day() {
        let result = build_trend_table(&series(json!([
            {"day": "2024-01-01", "avg": 10},
            {"day": "01/02/2024", "avg": 15}
        ])));
        match result {
            Err(AppError::UnexpectedData(msg)) => assert!(msg.contains("01/02/2024")),
            other => panic!("Expected UnexpectedData, got {:?}", other),
        }
    }

    #[test]
    fn test_trend_from_missing_forecast() {
        assert!(trend_from_forecast(None).unwrap().is_none());

        let no_pm25: Forecast =
            serde_json::from_value(json!({"daily": {"o3": [{"day": "2024-01-01", "avg": 3}]}}))
                .unwrap();
        assert!(trend_from_forecast(Some(&no_pm25)).unwrap().is_none());
    }

    #[test]
    fn test_trend_from_forecast_uses_pm25() {
        let forecast: Forecast = serde_json::from_value(json!({"daily": {
            "o3": [{"day": "2024-01-01", "avg": 3}],
            "pm25": [{"day": "2024-01-01", "avg": 80}, {"day": "2024-01-02", "avg": 95}]
        }}))
        .unwrap();
        let points = trend_from_forecast(Some(&forecast)).unwrap().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].average, 95.0);
    }
}
