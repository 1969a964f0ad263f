//! Interactive prompts (`dialoguer`) for the dashboard controls.
//!
//! Every prompt returns `Ok(None)` when the user cancels (Esc / Ctrl+C).

use crate::cli::ChartStyle;
use crate::error::Result;
use dialoguer::{theme::ColorfulTheme, FuzzySelect, Select};

/// Entries of the main menu, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    CheckAqi,
    CheckNearestStation,
    ChangeLocation,
    ChangeChartStyle,
    Exit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 5] = [
        MenuAction::CheckAqi,
        MenuAction::CheckNearestStation,
        MenuAction::ChangeLocation,
        MenuAction::ChangeChartStyle,
        MenuAction::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::CheckAqi => "Check AQI",
            MenuAction::CheckNearestStation => "Check AQI at Nearest Station",
            MenuAction::ChangeLocation => "Change Location",
            MenuAction::ChangeChartStyle => "Change Chart Type",
            MenuAction::Exit => "Exit",
        }
    }
}

fn position_of(items: &[String], current: Option<&str>) -> usize {
    current
        .and_then(|c| items.iter().position(|item| item == c))
        .unwrap_or(0)
}

/// Picks one entry of `items` with type-to-filter. `None` if cancelled or `items` is empty.
fn fuzzy_pick(prompt: &str, items: &[String], current: Option<&str>) -> Result<Option<String>> {
    if items.is_empty() {
        return Ok(None);
    }
    let selection = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(position_of(items, current))
        .interact_opt()?;
    Ok(selection.map(|i| items[i].clone()))
}

pub fn prompt_country(countries: &[String], current: Option<&str>) -> Result<Option<String>> {
    fuzzy_pick("Select Country (2-letter ISO code)", countries, current)
}

pub fn prompt_city(cities: &[String], current: Option<&str>) -> Result<Option<String>> {
    fuzzy_pick("Select City", cities, current)
}

pub fn prompt_chart_style(current: ChartStyle) -> Result<Option<ChartStyle>> {
    let labels: Vec<&str> = ChartStyle::ALL.iter().map(|s| s.label()).collect();
    let default = ChartStyle::ALL
        .iter()
        .position(|s| *s == current)
        .unwrap_or(0);
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select Chart Type")
        .items(&labels)
        .default(default)
        .interact_opt()?;
    Ok(selection.map(|i| ChartStyle::ALL[i]))
}

/// Main menu. Cancelling counts as `Exit`.
pub fn prompt_action(location: &str) -> Result<MenuAction> {
    let labels: Vec<&str> = MenuAction::ALL.iter().map(|a| a.label()).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("{} · What would you like to do?", location))
        .items(&labels)
        .default(0)
        .interact_opt()?
        .unwrap_or(labels.len() - 1);
    Ok(MenuAction::ALL[selection])
}
