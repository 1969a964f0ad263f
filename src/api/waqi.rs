//! Provides a client for the World Air Quality Index (WAQI) feed API.
//!
//! This module defines the `WaqiClient` struct and its method for fetching the current
//! reading of a station, either by city name or by geographic position.

use crate::error::{AppError, Result};
use crate::models::{FeedData, FeedEnvelope};
use reqwest::{Client, Url};
use std::fmt;
use tracing::{debug, error, info};

pub const DEFAULT_BASE_URL: &str = "https://api.waqi.info";

/// What to ask the provider for.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedTarget {
    /// Station matched by city name, `feed/{city}/`.
    City(String),
    /// Nearest station to a position, `feed/geo:{lat};{lon}/`.
    Geo { latitude: f64, longitude: f64 },
}

impl FeedTarget {
    fn path_segment(&self) -> String {
        match self {
            FeedTarget::City(name) => name.trim().to_string(),
            FeedTarget::Geo {
                latitude,
                longitude,
            } => format!("geo:{};{}", latitude, longitude),
        }
    }
}

impl fmt::Display for FeedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedTarget::City(name) => f.write_str(name),
            FeedTarget::Geo {
                latitude,
                longitude,
            } => write!(f, "{:.4}, {:.4}", latitude, longitude),
        }
    }
}

/// An asynchronous client for the WAQI feed endpoint.
pub struct WaqiClient {
    client: Client,
    token: String,
    base_url: String,
}

impl WaqiClient {
    /// Creates a new `WaqiClient` against `base_url` (normally [`DEFAULT_BASE_URL`]).
    pub fn new(token: String, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn feed_url(&self, target: &FeedTarget) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            AppError::Config(format!("invalid WAQI base URL '{}': {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("WAQI base URL '{}' cannot be a base", self.base_url)))?
            .pop_if_empty()
            .push("feed")
            .push(&target.path_segment())
            .push("");
        Ok(url)
    }

    /// Fetches the current reading for `target`.
    ///
    /// # Errors
    ///
    /// * `AppError::Api` on transport failure or a non-2xx HTTP status.
    /// * `AppError::NoData` when the provider answers with a status other than `"ok"`.
    /// * `AppError::UnexpectedData` when the payload does not match the expected schema.
    pub async fn fetch_feed(&self, target: &FeedTarget) -> Result<FeedData> {
        info!("Fetching AQI feed for {}", target);

        let url = self.feed_url(target)?;

        let response = self
            .client
            .get(url)
            .query(&[("token", self.token.as_str())])
            .send()
            .await
            .map_err(|e| {
                error!("Error fetching AQI feed for {}: {}", target, e);
                AppError::Api(e.into())
            })?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                error!(
                    "AQI feed request for {} failed with status {}",
                    target,
                    e.status().unwrap_or_default()
                );
                return Err(AppError::Api(e.into()));
            },
        };

        let body = response.text().await.map_err(|e| {
            error!("Error reading AQI feed body: {}", e);
            AppError::Api(e.into())
        })?;

        let envelope: FeedEnvelope = serde_json::from_str(&body).map_err(|e| {
            error!("AQI feed body is not a valid envelope: {}", e);
            AppError::UnexpectedData(format!("response is not a feed envelope: {}", e))
        })?;

        if !envelope.is_ok() {
            let reason = envelope.failure_reason();
            info!("Provider has no data for {}: {}", target, reason);
            return Err(AppError::NoData {
                city: target.to_string(),
                reason,
            });
        }

        let data: FeedData = serde_json::from_value(envelope.data).map_err(|e| {
            error!("AQI feed payload for {} has an unexpected shape: {}", target, e);
            AppError::UnexpectedData(format!("feed payload: {}", e))
        })?;

        debug!(
            "Received {} readings for station '{}'",
            data.iaqi.len(),
            data.city.name
        );

        Ok(data)
    }
}
