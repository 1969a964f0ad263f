//! Maps an AQI value onto the US EPA severity categories.

use std::ops::RangeInclusive;

/// Severity category of an AQI value. Variants are ordered from cleanest to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeverityBand {
    Good,
    Moderate,
    UnhealthyForSensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

/// Inclusive upper bounds, checked in order. Anything above the last one is `Hazardous`.
const UPPER_BOUNDS: [(u32, SeverityBand); 5] = [
    (50, SeverityBand::Good),
    (100, SeverityBand::Moderate),
    (150, SeverityBand::UnhealthyForSensitive),
    (200, SeverityBand::Unhealthy),
    (300, SeverityBand::VeryUnhealthy),
];

/// Returns the band containing `aqi`.
///
/// `None` for negative or non-finite input; every other value maps to exactly one band.
pub fn classify(aqi: f64) -> Option<SeverityBand> {
    if !aqi.is_finite() || aqi < 0.0 {
        return None;
    }
    let band = UPPER_BOUNDS
        .iter()
        .find(|(upper, _)| aqi <= f64::from(*upper))
        .map(|(_, band)| *band)
        .unwrap_or(SeverityBand::Hazardous);
    Some(band)
}

impl SeverityBand {
    pub fn label(self) -> &'static str {
        match self {
            SeverityBand::Good => "Good 😄",
            SeverityBand::Moderate => "Moderate 🙂",
            SeverityBand::UnhealthyForSensitive => "Unhealthy for Sensitive Groups 😕",
            SeverityBand::Unhealthy => "Unhealthy 😷",
            SeverityBand::VeryUnhealthy => "Very Unhealthy 🤢",
            SeverityBand::Hazardous => "Hazardous ☠️",
        }
    }

    /// CSS-style color name of the band.
    pub fn color_name(self) -> &'static str {
        match self {
            SeverityBand::Good => "green",
            SeverityBand::Moderate => "yellow",
            SeverityBand::UnhealthyForSensitive => "orange",
            SeverityBand::Unhealthy => "red",
            SeverityBand::VeryUnhealthy => "purple",
            SeverityBand::Hazardous => "maroon",
        }
    }

    /// RGB value of [`Self::color_name`].
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            SeverityBand::Good => (0, 128, 0),
            SeverityBand::Moderate => (255, 255, 0),
            SeverityBand::UnhealthyForSensitive => (255, 165, 0),
            SeverityBand::Unhealthy => (255, 0, 0),
            SeverityBand::VeryUnhealthy => (128, 0, 128),
            SeverityBand::Hazardous => (128, 0, 0),
        }
    }

    /// Integer AQI range covered by the band. `Hazardous` is open-ended.
    pub fn range(self) -> RangeInclusive<u32> {
        match self {
            SeverityBand::Good => 0..=50,
            SeverityBand::Moderate => 51..=100,
            SeverityBand::UnhealthyForSensitive => 101..=150,
            SeverityBand::Unhealthy => 151..=200,
            SeverityBand::VeryUnhealthy => 201..=300,
            SeverityBand::Hazardous => 301..=u32::MAX,
        }
    }
}
