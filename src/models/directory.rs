//! The static country/city reference list used to populate the location prompts.

use serde::Deserialize;
use std::collections::BTreeSet;

/// One record of the directory source (`{country, name, lat, lng}`).
#[derive(Debug, Clone, Deserialize)]
pub struct CityRecord {
    pub country: String,
    pub name: String,
    #[serde(default)]
    pub lat: Option<NumberOrText>,
    #[serde(default)]
    pub lng: Option<NumberOrText>,
}

/// Coordinates in the source list are sometimes quoted, sometimes not.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// A normalized directory entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CityDirectoryEntry {
    pub country_code: String,
    pub city_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<CityRecord> for CityDirectoryEntry {
    fn from(record: CityRecord) -> Self {
        Self {
            country_code: record.country,
            city_name: record.name,
            latitude: record.lat.as_ref().and_then(NumberOrText::as_f64),
            longitude: record.lng.as_ref().and_then(NumberOrText::as_f64),
        }
    }
}

/// Read-only list of known cities. Built once per process.
#[derive(Debug, Clone, Default)]
pub struct CityDirectory {
    entries: Vec<CityDirectoryEntry>,
}

impl CityDirectory {
    pub fn new(records: Vec<CityRecord>) -> Self {
        Self {
            entries: records.into_iter().map(CityDirectoryEntry::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Distinct country codes, sorted.
    pub fn countries(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.country_code.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct city names of `country_code`, sorted. Matching is exact.
    pub fn cities(&self, country_code: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.country_code == country_code)
            .map(|e| e.city_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// First entry matching both country and city.
    pub fn lookup(&self, country_code: &str, city_name: &str) -> Option<&CityDirectoryEntry> {
        self.entries
            .iter()
            .find(|e| e.country_code == country_code && e.city_name == city_name)
    }
}
