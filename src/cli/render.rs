//! Presentation of the dashboard: status panel, the two charts and station metadata.

use crate::analysis::SeverityBand;
use crate::cli::{ChartStyle, Series, SessionState, Snapshot};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;

pub const PLACEHOLDER: &str = "Select 'Check AQI' first to load data.";
pub const POLLUTANT_HEADING: &str = "📊 Pollutant Chart";
pub const TREND_HEADING: &str = "📈 Weekly Pollution Trend";
pub const NO_POLLUTANTS: &str = "No pollutant readings reported by this station.";
pub const NO_TREND: &str = "No trend available for this station.";

const PANEL_WIDTH: usize = 44;

/// The colored headline box.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusPanel {
    pub aqi: f64,
    pub band: SeverityBand,
    pub place: String,
}

impl StatusPanel {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            aqi: snapshot.reading.aqi,
            band: snapshot.band,
            place: title_case(&snapshot.place),
        }
    }

    pub fn render(&self) -> String {
        let (r, g, b) = self.band.rgb();
        // Dark text on the light bands, white on the rest.
        let dark_text = matches!(
            self.band,
            SeverityBand::Moderate | SeverityBand::UnhealthyForSensitive
        );
        [
            String::new(),
            format!("AQI: {}", self.aqi),
            self.band.label().to_string(),
            self.place.clone(),
            String::new(),
        ]
        .iter()
        .map(|line| {
            let padded = format!("{:^width$}", line, width = PANEL_WIDTH).on_truecolor(r, g, b);
            let styled = if dark_text {
                padded.black()
            } else {
                padded.white()
            };
            format!("  {}\n", styled.bold())
        })
        .collect::<String>()
            + &format!("  {}\n", self.range_text().dimmed())
    }

    fn range_text(&self) -> String {
        let range = self.band.range();
        if *range.end() == u32::MAX {
            format!("Band: AQI {}+ ({})", range.start(), self.band.color_name())
        } else {
            format!(
                "Band: AQI {}-{} ({})",
                range.start(),
                range.end(),
                self.band.color_name()
            )
        }
    }
}

/// Renders the whole dashboard for the current state.
pub fn render_dashboard(state: &SessionState, style: ChartStyle) -> String {
    match state {
        SessionState::Empty => format!("{} {}\n", "ℹ".blue().bold(), PLACEHOLDER),
        SessionState::Failed(notice) => format!("{} {}\n", "⚠".yellow().bold(), notice.message()),
        SessionState::Loaded(snapshot) => render_snapshot(snapshot, style),
    }
}

fn render_snapshot(snapshot: &Snapshot, style: ChartStyle) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n\n", "🌫️ Current Air Quality".bold()));
    out.push_str(&StatusPanel::from_snapshot(snapshot).render());

    out.push_str(&format!("\n{}\n", POLLUTANT_HEADING.bold()));
    if snapshot.pollutants.is_empty() {
        out.push_str(&format!("{}\n", NO_POLLUTANTS.dimmed()));
    } else {
        out.push_str(&style.render(&Series::from_pollutants(&snapshot.pollutants, style)));
    }

    out.push_str(&format!("\n{}\n", TREND_HEADING.bold()));
    match snapshot.trend.as_deref() {
        Some(points) if !points.is_empty() => {
            out.push_str(&style.render(&Series::from_trend(points, style)));
        },
        _ => out.push_str(&format!("{}\n", NO_TREND.dimmed())),
    }

    out.push_str(&format!("\n{}\n", "📍 Location Info".bold()));
    out.push_str(&location_table(snapshot).to_string());
    out.push('\n');
    out
}

fn location_table(snapshot: &Snapshot) -> Table {
    let reading = &snapshot.reading;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Field", "Value"]);

    table.add_row(vec![
        "Latitude".to_string(),
        reading.coordinates.latitude.to_string(),
    ]);
    table.add_row(vec![
        "Longitude".to_string(),
        reading.coordinates.longitude.to_string(),
    ]);
    table.add_row(vec!["Station".to_string(), reading.station_name.clone()]);
    if let Some(pollutant) = &reading.dominant_pollutant {
        table.add_row(vec!["Dominant pollutant".to_string(), pollutant.clone()]);
    }
    if let Some(observed) = &reading.observed_at {
        table.add_row(vec!["Observed".to_string(), observed.clone()]);
    }
    if let Some(url) = &reading.station_url {
        table.add_row(vec!["Station page".to_string(), url.clone()]);
    }
    if !reading.attributions.is_empty() {
        table.add_row(vec![
            "Data source".to_string(),
            reading.attributions.join("\n"),
        ]);
    }
    table
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::FeedData;
    use serde_json::json;

    fn loaded(aqi: u32, with_tables: bool) -> SessionState {
        let payload = if with_tables {
            json!({
                "aqi": aqi,
                "dominentpol": "pm25",
                "city": {"name": "Anand Vihar, Delhi, India", "geo": [28.647, 77.316]},
                "attributions": [{"name": "CPCB - India Central Pollution Control Board"}],
                "iaqi": {"pm25": {"v": aqi}, "no2": {"v": 31}},
                "time": {"s": "2024-01-01 10:00:00", "tz": "+05:30"},
                "forecast": {"daily": {"pm25": [
                    {"day": "2024-01-01", "avg": 260},
                    {"day": "2024-01-02", "avg": 240}
                ]}}
            })
        } else {
            json!({"aqi": aqi, "city": {"name": "Bare Station", "geo": [1.5, 2.5]}})
        };
        let data: FeedData = serde_json::from_value(payload).unwrap();
        SessionState::from_fetch("new delhi", Ok(data))
    }

    #[test]
    fn test_placeholder_before_first_fetch() {
        let out = render_dashboard(&SessionState::Empty, ChartStyle::Bar);
        assert!(out.contains(PLACEHOLDER));
        assert!(!out.contains(POLLUTANT_HEADING));
    }

    #[test]
    fn test_status_panel_for_very_unhealthy() {
        let state = loaded(275, true);
        let SessionState::Loaded(snapshot) = &state else {
            panic!("Expected Loaded state");
        };
        let panel = StatusPanel::from_snapshot(snapshot);
        assert_eq!(panel.band, SeverityBand::VeryUnhealthy);
        assert_eq!(panel.band.color_name(), "purple");
        assert_eq!(panel.place, "New Delhi");

        let out = render_dashboard(&state, ChartStyle::Bar);
        assert!(out.contains("AQI: 275"));
        assert!(out.contains("Very Unhealthy"));
        assert!(out.contains("New Delhi"));
        assert!(out.contains("Band: AQI 201-300 (purple)"));
    }

    #[test]
    fn test_fractional_aqi_panel_uses_exact_value() {
        let data: FeedData = serde_json::from_value(
            json!({"aqi": 50.3, "city": {"name": "Edge Station", "geo": [1.5, 2.5]}}),
        )
        .unwrap();
        let out = render_dashboard(&SessionState::from_fetch("edge", Ok(data)), ChartStyle::Bar);
        assert!(out.contains("AQI: 50.3"));
        assert!(out.contains("Moderate"));
        assert!(out.contains("Band: AQI 51-100 (yellow)"));
    }

    #[test]
    fn test_hazardous_range_is_open_ended() {
        let state = loaded(412, false);
        let out = render_dashboard(&state, ChartStyle::Bar);
        assert!(out.contains("Hazardous"));
        assert!(out.contains("Band: AQI 301+ (maroon)"));
    }

    #[test]
    fn test_loaded_dashboard_has_both_charts_and_metadata() {
        let out = render_dashboard(&loaded(42, true), ChartStyle::Line);
        assert!(out.contains(POLLUTANT_HEADING));
        assert!(out.contains("Pollutant Trends"));
        assert!(out.contains(TREND_HEADING));
        assert!(out.contains("2024-01-02"));
        assert!(out.contains("Anand Vihar, Delhi, India"));
        assert!(out.contains("28.647"));
        assert!(out.contains("77.316"));
        assert!(out.contains("+05:30"));
        assert!(out.contains("CPCB - India Central Pollution Control Board"));
    }

    #[test]
    fn test_missing_tables_render_no_data_states() {
        let out = render_dashboard(&loaded(10, false), ChartStyle::Pie);
        assert!(out.contains(NO_POLLUTANTS));
        assert!(out.contains(NO_TREND));
        assert!(!out.contains("Pollutant Distribution"));
        assert!(out.contains("Bare Station"));
    }

    #[test]
    fn test_error_status_renders_message_without_charts() {
        let state = SessionState::from_fetch(
            "atlantis",
            Err(AppError::NoData {
                city: "atlantis".to_string(),
                reason: "Unknown station".to_string(),
            }),
        );
        let out = render_dashboard(&state, ChartStyle::Bar);
        assert!(out.contains("No data for atlantis"));
        assert!(!out.contains(POLLUTANT_HEADING));
        assert!(!out.contains(TREND_HEADING));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("new DELHI"), "New Delhi");
        assert_eq!(title_case("são paulo"), "São Paulo");
    }
}
