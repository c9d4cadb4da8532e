//! Chart emitters
//!
//! Each chart is a small struct borrowing one aggregation result. Charts
//! draw onto any plotters backend; [`render`] picks PNG or SVG and writes
//! the file under a fixed name.

pub mod distribution;
pub mod gold;
pub mod region;

pub use distribution::{DurationDistributionChart, WinsByDurationChart};
pub use gold::{GoldHistogramChart, GoldScatterChart, WinRateChart};
pub use region::WinComparisonChart;

use crate::{ChartConfig, Result, StatsError, StyleConfig};
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static SANS_SERIF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Image format for rendered charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartFormat {
    Png,
    Svg,
}

impl ChartFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ChartFormat::Png => "png",
            ChartFormat::Svg => "svg",
        }
    }
}

impl std::str::FromStr for ChartFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ChartFormat::Png),
            "svg" => Ok(ChartFormat::Svg),
            _ => Err(format!("Unknown chart format: {}. Use png or svg.", s)),
        }
    }
}

/// The six charts the pipeline can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    DurationDistribution,
    WinComparison,
    WinsByDuration,
    WinRateByGold,
    GoldHistogram,
    GoldScatter,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::DurationDistribution,
        ChartKind::WinComparison,
        ChartKind::WinsByDuration,
        ChartKind::WinRateByGold,
        ChartKind::GoldHistogram,
        ChartKind::GoldScatter,
    ];

    /// Output file name without extension
    pub fn file_stem(&self) -> &'static str {
        match self {
            ChartKind::DurationDistribution => "game_length_distribution",
            ChartKind::WinComparison => "win_comparison",
            ChartKind::WinsByDuration => "red_vs_blue_by_length",
            ChartKind::WinRateByGold => "win_rate_vs_gold_difference",
            ChartKind::GoldHistogram => "gold_difference_histogram",
            ChartKind::GoldScatter => "scatter_gold_difference",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_stem())
    }
}

/// Resolved styling shared by all emitters
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub format: ChartFormat,
    pub width: u32,
    pub height: u32,
    pub histogram_bins: usize,
    pub blue: RGBColor,
    pub red: RGBColor,
    pub q1: RGBColor,
    pub median: RGBColor,
    pub q3: RGBColor,
}

impl ChartStyle {
    pub fn from_config(charts: &ChartConfig, style: &StyleConfig) -> Result<Self> {
        if charts.width == 0 || charts.height == 0 {
            return Err(StatsError::Config(format!(
                "chart size must be non-zero, got {}x{}",
                charts.width, charts.height
            )));
        }
        if charts.histogram_bins == 0 {
            return Err(StatsError::Config(
                "histogram_bins must be at least 1".to_string(),
            ));
        }

        Ok(ChartStyle {
            format: charts.format,
            width: charts.width,
            height: charts.height,
            histogram_bins: charts.histogram_bins,
            blue: parse_hex_color(&style.blue_color)?,
            red: parse_hex_color(&style.red_color)?,
            q1: parse_hex_color(&style.q1_color)?,
            median: parse_hex_color(&style.median_color)?,
            q3: parse_hex_color(&style.q3_color)?,
        })
    }

    /// Colour for a win by blue (`true`) or red (`false`)
    pub fn side_color(&self, blue_won: bool) -> RGBColor {
        if blue_won {
            self.blue
        } else {
            self.red
        }
    }
}

/// Parse `#RRGGBB`
pub fn parse_hex_color(hex: &str) -> Result<RGBColor> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    let bad = || StatsError::Config(format!("Invalid colour '{}', expected #RRGGBB", hex));
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(bad());
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| bad());
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// A chart that can draw itself on any plotters backend
pub trait Chart {
    const KIND: ChartKind;

    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &ChartStyle) -> Result<()>
    where
        DB: DrawingBackend;
}

/// Register the bundled font under "sans-serif", once per process.
///
/// plotters has no system font lookup in this build; every caption, tick
/// label and legend resolves through this registration.
pub fn register_fonts() -> Result<()> {
    static REGISTERED: OnceLock<std::result::Result<(), String>> = OnceLock::new();
    REGISTERED
        .get_or_init(|| {
            plotters::style::register_font("sans-serif", FontStyle::Normal, SANS_SERIF)
                .map_err(|_| "bundled font failed to parse".to_string())
        })
        .clone()
        .map_err(StatsError::Chart)
}

/// Render `chart` into `dir`, returning the written path.
pub fn render<C: Chart>(chart: &C, dir: &Path, style: &ChartStyle) -> Result<PathBuf> {
    register_fonts()?;
    let path = dir.join(format!(
        "{}.{}",
        C::KIND.file_stem(),
        style.format.extension()
    ));
    let size = (style.width, style.height);

    match style.format {
        ChartFormat::Png => {
            let root = BitMapBackend::new(&path, size).into_drawing_area();
            root.fill(&WHITE)?;
            chart.draw(&root, style)?;
            root.present()?;
        }
        ChartFormat::Svg => {
            let root = SVGBackend::new(&path, size).into_drawing_area();
            root.fill(&WHITE)?;
            chart.draw(&root, style)?;
            root.present()?;
        }
    }

    log::info!("Wrote {}", path.display());
    Ok(path)
}

/// Range spanning `values` with a little padding; falls back to `default`
/// when there is nothing to span.
fn padded_range(values: impl Iterator<Item = f64>, default: (f64, f64)) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return default;
    }
    let pad = ((max - min) * 0.05).max(1.0);
    (min - pad, max + pad)
}
