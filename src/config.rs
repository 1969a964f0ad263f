//! Runtime configuration, read from the process environment (and a `.env` file if present).

use crate::api::{DEFAULT_BASE_URL, DEFAULT_DIRECTORY_URL};
use crate::cli::ChartStyle;
use crate::error::{AppError, Result};
use clap::ValueEnum;
use std::env;
use std::path::PathBuf;

pub const TOKEN_VAR: &str = "WAQI_TOKEN";
pub const BASE_URL_VAR: &str = "WAQI_BASE_URL";
pub const DIRECTORY_URL_VAR: &str = "CITY_DIRECTORY_URL";
pub const CHART_STYLE_VAR: &str = "AQI_CHART_STYLE";
pub const LOG_DIR_VAR: &str = "AQI_LOG_DIR";

#[derive(Debug, Clone)]
pub struct Config {
    pub waqi_token: String,
    pub waqi_base_url: String,
    pub city_directory_url: String,
    pub chart_style: ChartStyle,
    /// When set, logs are also written to a daily-rolling file in this directory.
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Loads the configuration. Only `WAQI_TOKEN` is mandatory.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        // Logging is not initialized yet; the caller reports failures.
        let waqi_token = env::var(TOKEN_VAR)?;
        if waqi_token.trim().is_empty() {
            return Err(AppError::Config(format!("{} is empty", TOKEN_VAR)));
        }

        let chart_style = match non_empty_var(CHART_STYLE_VAR) {
            Some(raw) => ChartStyle::from_str(&raw, true).map_err(|_| {
                AppError::Config(format!(
                    "{}='{}' is not one of bar, line, pie, scatter, area",
                    CHART_STYLE_VAR, raw
                ))
            })?,
            None => ChartStyle::default(),
        };

        Ok(Self {
            waqi_token,
            waqi_base_url: non_empty_var(BASE_URL_VAR)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            city_directory_url: non_empty_var(DIRECTORY_URL_VAR)
                .unwrap_or_else(|| DEFAULT_DIRECTORY_URL.to_string()),
            chart_style,
            log_dir: non_empty_var(LOG_DIR_VAR).map(PathBuf::from),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
