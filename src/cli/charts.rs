//! Text charts for the terminal dashboard.
//!
//! Both dashboard tables are turned into a [`Series`] and drawn by [`ChartStyle::render`],
//! so every style is implemented once for any table.

use crate::models::{PollutantRow, TrendPoint};
use clap::ValueEnum;
use colored::*;

const BAR_WIDTH: usize = 40;
const PLOT_HEIGHT: usize = 10;
const AXIS_WIDTH: usize = 9;

const PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::Red,
];

/// Chart style chosen by the user. The same style is applied to both charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ChartStyle {
    #[default]
    Bar,
    Line,
    Pie,
    Scatter,
    Area,
}

impl ChartStyle {
    pub const ALL: [ChartStyle; 5] = [
        ChartStyle::Bar,
        ChartStyle::Line,
        ChartStyle::Pie,
        ChartStyle::Scatter,
        ChartStyle::Area,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartStyle::Bar => "Bar Chart",
            ChartStyle::Line => "Line Chart",
            ChartStyle::Pie => "Pie Chart",
            ChartStyle::Scatter => "Scatter Plot",
            ChartStyle::Area => "Area Chart",
        }
    }

    fn pollutant_title(self) -> &'static str {
        match self {
            ChartStyle::Bar => "Pollutant Concentrations",
            ChartStyle::Line => "Pollutant Trends",
            ChartStyle::Pie => "Pollutant Distribution",
            ChartStyle::Scatter => "Pollutant Scatter Graph",
            ChartStyle::Area => "Pollutant Area Chart",
        }
    }

    fn trend_title(self) -> &'static str {
        match self {
            ChartStyle::Pie => "Weekly Pollution Contribution",
            _ => "Weekly Pollution Trend",
        }
    }

    /// Draws `series` in this style, title included.
    pub fn render(self, series: &Series) -> String {
        let body = if series.points.is_empty() {
            "  (no data)\n".to_string()
        } else {
            match self {
                ChartStyle::Bar => bars(series),
                ChartStyle::Pie => pie(series),
                ChartStyle::Line => plot(series, Mark::Line),
                ChartStyle::Scatter => plot(series, Mark::Scatter),
                ChartStyle::Area => plot(series, Mark::Area),
            }
        };
        format!("{}\n{}", series.title.bold(), body)
    }
}

/// Labelled values in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub title: String,
    pub points: Vec<(String, f64)>,
}

impl Series {
    pub fn from_pollutants(rows: &[PollutantRow], style: ChartStyle) -> Self {
        Self {
            title: style.pollutant_title().to_string(),
            points: rows
                .iter()
                .map(|r| (r.pollutant.clone(), r.value))
                .collect(),
        }
    }

    pub fn from_trend(points: &[TrendPoint], style: ChartStyle) -> Self {
        Self {
            title: style.trend_title().to_string(),
            points: points
                .iter()
                .map(|p| (p.date.format("%Y-%m-%d").to_string(), p.average))
                .collect(),
        }
    }

    fn label_width(&self) -> usize {
        self.points
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0)
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn bars(series: &Series) -> String {
    let width = series.label_width();
    let max_abs = series
        .points
        .iter()
        .map(|(_, v)| v.abs())
        .fold(0.0_f64, f64::max);
    let scale = if max_abs > 0.0 { max_abs } else { 1.0 };

    let mut out = String::new();
    for (label, value) in &series.points {
        let len = ((value.abs() / scale) * BAR_WIDTH as f64).round() as usize;
        let glyph = if *value < 0.0 { "░" } else { "█" };
        out.push_str(&format!(
            "  {:>width$} │{} {}\n",
            label,
            glyph.repeat(len).cyan(),
            format_value(*value),
            width = width
        ));
    }
    out
}

/// Share of each positive value in the total. Non-positive values take no slice.
fn pie(series: &Series) -> String {
    let total: f64 = series.points.iter().map(|(_, v)| v.max(0.0)).sum();
    if total <= 0.0 {
        return "  (nothing to apportion)\n".to_string();
    }

    let width = series.label_width();
    let mut out = String::new();
    for (i, (label, value)) in series.points.iter().enumerate() {
        if *value <= 0.0 {
            continue;
        }
        let share = value / total;
        let len = (share * BAR_WIDTH as f64).round() as usize;
        let color = PALETTE[i % PALETTE.len()];
        out.push_str(&format!(
            "  {} {:<width$} {:>5.1}% {}\n",
            "●".color(color),
            label,
            share * 100.0,
            "█".repeat(len).color(color),
            width = width
        ));
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Line,
    Scatter,
    Area,
}

/// Vertical plot: one column group per point, value axis on the left.
fn plot(series: &Series, mark: Mark) -> String {
    let values: Vec<f64> = series.points.iter().map(|(_, v)| *v).collect();
    let lo = values.iter().copied().fold(0.0_f64, f64::min);
    let mut hi = values.iter().copied().fold(f64::MIN, f64::max);
    if hi <= lo {
        hi = lo + 1.0;
    }
    let max_abs = values.iter().map(|v| v.abs()).fold(0.0_f64, f64::max);

    let col_width = series.label_width().max(3) + 1;
    let canvas_width = col_width * values.len();
    let center = |i: usize| i * col_width + col_width / 2;
    let level = |v: f64| (((v - lo) / (hi - lo)) * (PLOT_HEIGHT - 1) as f64).round() as usize;

    let mut canvas = vec![vec![' '; canvas_width]; PLOT_HEIGHT];

    // Interpolated height at every column between the first and last point.
    if mark != Mark::Scatter {
        for pair in 0..values.len().saturating_sub(1) {
            let (x0, x1) = (center(pair), center(pair + 1));
            for x in x0..=x1 {
                let t = (x - x0) as f64 / (x1 - x0) as f64;
                let y = level(values[pair] + t * (values[pair + 1] - values[pair]));
                match mark {
                    Mark::Line => canvas[y][x] = '·',
                    _ => {
                        for row in canvas.iter_mut().take(y) {
                            row[x] = '░';
                        }
                        canvas[y][x] = '▓';
                    },
                }
            }
        }
    }

    for (i, v) in values.iter().enumerate() {
        let glyph = match mark {
            Mark::Scatter => scatter_glyph(v.abs(), max_abs),
            Mark::Line => '●',
            Mark::Area => '▓',
        };
        let y = level(*v);
        if mark == Mark::Area {
            for row in canvas.iter_mut().take(y) {
                row[center(i)] = '░';
            }
        }
        canvas[y][center(i)] = glyph;
    }

    let mut out = String::new();
    for row in (0..PLOT_HEIGHT).rev() {
        let axis = if row == PLOT_HEIGHT - 1 {
            format!("{:>width$} ┤", format_value(hi), width = AXIS_WIDTH - 2)
        } else if row == 0 {
            format!("{:>width$} ┤", format_value(lo), width = AXIS_WIDTH - 2)
        } else {
            format!("{:>width$}", "│", width = AXIS_WIDTH)
        };
        let line: String = canvas[row].iter().collect();
        out.push_str(&format!("{}{}\n", axis, line.trim_end().cyan()));
    }
    out.push_str(&format!(
        "{:>width$}{}\n",
        "└",
        "─".repeat(canvas_width),
        width = AXIS_WIDTH
    ));
    let labels: String = series
        .points
        .iter()
        .map(|(label, _)| format!("{:^width$}", label, width = col_width))
        .collect();
    out.push_str(&format!("{:width$}{}\n", "", labels, width = AXIS_WIDTH));
    out
}

/// Marker size proportional to the value, like a bubble chart.
fn scatter_glyph(value: f64, max_abs: f64) -> char {
    if max_abs <= 0.0 {
        return '·';
    }
    let ratio = value / max_abs;
    if ratio < 1.0 / 3.0 {
        '·'
    } else if ratio < 2.0 / 3.0 {
        '•'
    } else {
        '●'
    }
}
