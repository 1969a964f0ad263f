//! Fetches the static country/city reference list.

use crate::error::{AppError, Result};
use crate::models::{CityDirectory, CityRecord};
use reqwest::Client;
use tracing::{error, info};

pub const DEFAULT_DIRECTORY_URL: &str =
    "https://raw.githubusercontent.com/lutangar/cities.json/master/cities.json";

/// Downloads the city list. Every failure maps to `AppError::Directory`.
pub struct DirectoryClient {
    client: Client,
    url: String,
}

impl DirectoryClient {
    pub fn new(url: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.to_string(),
        }
    }

    pub async fn fetch(&self) -> Result<CityDirectory> {
        info!("Loading city directory from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                error!("Failed to download city directory: {}", e);
                AppError::Directory(e.to_string())
            })?;

        let records: Vec<CityRecord> = response.json().await.map_err(|e| {
            error!("City directory payload is malformed: {}", e);
            AppError::Directory(format!("malformed payload: {}", e))
        })?;

        if records.is_empty() {
            return Err(AppError::Directory("directory source is empty".to_string()));
        }

        let directory = CityDirectory::new(records);
        info!("City directory loaded with {} entries", directory.len());
        Ok(directory)
    }
}
