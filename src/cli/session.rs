//! Session-scoped dashboard state.
//!
//! The state is an explicit value owned by the caller: the fetch handler produces a new
//! one from each fetch result and the renderer only reads it. Nothing is persisted.

use crate::analysis::{build_pollutant_table, classify, trend_from_forecast, SeverityBand};
use crate::error::{AppError, Result};
use crate::models::{AirQualityReading, FeedData, PollutantRow, TrendPoint};
use tracing::{info, warn};

/// Everything the dashboard shows for one successful fetch.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Place the user asked for (city name or position).
    pub place: String,
    pub reading: AirQualityReading,
    pub band: SeverityBand,
    pub pollutants: Vec<PollutantRow>,
    /// `None` when the provider sent no PM2.5 forecast.
    pub trend: Option<Vec<TrendPoint>>,
}

impl Snapshot {
    /// Validates a feed payload and derives both tables from it.
    pub fn build(place: &str, data: FeedData) -> Result<Self> {
        let reading = AirQualityReading::from_feed(place, data)?;
        let band = classify(reading.aqi).ok_or_else(|| {
            AppError::UnexpectedData(format!("AQI {} cannot be classified", reading.aqi))
        })?;
        let pollutants = build_pollutant_table(&reading.pollutants);
        let trend = trend_from_forecast(reading.forecast.as_ref())?;

        Ok(Self {
            place: place.to_string(),
            reading,
            band,
            pollutants,
            trend,
        })
    }
}

/// Why the last fetch produced nothing to chart.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The provider has no reading for the place.
    NoData { place: String, reason: String },
    /// The provider answered with something we could not interpret.
    UnexpectedData(String),
    /// The provider could not be reached.
    Unavailable(String),
}

impl Notice {
    fn from_error(place: &str, err: AppError) -> Self {
        match err {
            AppError::NoData { reason, .. } => Notice::NoData {
                place: place.to_string(),
                reason,
            },
            AppError::UnexpectedData(msg) => Notice::UnexpectedData(msg),
            other => Notice::Unavailable(other.to_string()),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::NoData { place, reason } => {
                format!("No data for {}. The provider says: {}", place, reason)
            },
            Notice::UnexpectedData(msg) => {
                format!("Unexpected data from the air-quality service: {}", msg)
            },
            Notice::Unavailable(msg) => {
                format!("Could not reach the air-quality service: {}", msg)
            },
        }
    }
}

/// Current state of the dashboard.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// Nothing fetched yet.
    #[default]
    Empty,
    Loaded(Box<Snapshot>),
    /// The last fetch failed. Earlier data is discarded.
    Failed(Notice),
}

impl SessionState {
    /// Turns the outcome of one fetch into the next state.
    pub fn from_fetch(place: &str, fetched: Result<FeedData>) -> Self {
        match fetched.and_then(|data| Snapshot::build(place, data)) {
            Ok(snapshot) => {
                info!(
                    "Loaded AQI {} ({:?}, {}) for {}",
                    snapshot.reading.aqi,
                    snapshot.band,
                    snapshot.band.color_name(),
                    place
                );
                SessionState::Loaded(Box::new(snapshot))
            },
            Err(e) => {
                warn!("Fetch for {} produced no dashboard: {}", place, e);
                SessionState::Failed(Notice::from_error(place, e))
            },
        }
    }
}
