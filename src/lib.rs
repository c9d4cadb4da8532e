//! Match statistics for competitive games
//!
//! Loads per-match records, reduces the in-match gold difference to its final
//! sample and renders a fixed set of descriptive charts.

pub mod charts;
pub mod data;
pub mod features;
pub mod pipeline;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One of the two competing sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Blue,
    Red,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Blue => write!(f, "Blue"),
            Side::Red => write!(f, "Red"),
        }
    }
}

/// A single match row from the source table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Match length in minutes
    pub duration: f64,
    pub blue_won: bool,
    pub red_won: bool,
    /// League / region label, kept verbatim
    pub region: String,
    /// Serialized gold difference samples, e.g. `"[0, 120, -340]"`
    pub resource_diff_raw: String,
    /// Final gold difference sample, filled in by the normalizer
    pub resource_diff: Option<f64>,
}

impl MatchRecord {
    pub fn new(
        duration: f64,
        blue_won: bool,
        red_won: bool,
        region: impl Into<String>,
        resource_diff_raw: impl Into<String>,
    ) -> Self {
        MatchRecord {
            duration,
            blue_won,
            red_won,
            region: region.into(),
            resource_diff_raw: resource_diff_raw.into(),
            resource_diff: None,
        }
    }

    /// Whether `side` is marked as a winner of this match
    pub fn won(&self, side: Side) -> bool {
        match side {
            Side::Blue => self.blue_won,
            Side::Red => self.red_won,
        }
    }

    /// Side holding the gold lead at the final sample (positive = blue)
    pub fn gold_leader(&self) -> Option<Side> {
        match self.resource_diff {
            Some(d) if d > 0.0 => Some(Side::Blue),
            Some(d) if d < 0.0 => Some(Side::Red),
            _ => None,
        }
    }
}

/// Application-wide errors
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("No usable match records in {0}")]
    EmptyDataset(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid bucket layout: {0}")]
    InvalidBuckets(String),

    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for StatsError
where
    E: std::error::Error + Send + Sync,
{
    fn from(e: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        StatsError::Chart(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;

/// Application configuration loaded from matchstats.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub columns: ColumnConfig,
    pub buckets: BucketConfig,
    pub charts: ChartConfig,
    pub style: StyleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    pub csv_path: String,
}

/// Source column names for each record field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub duration: String,
    pub blue_won: String,
    pub red_won: String,
    pub region: String,
    pub resource_diff: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketConfig {
    pub lower: f64,
    pub upper: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub output_dir: String,
    pub format: charts::ChartFormat,
    pub width: u32,
    pub height: u32,
    pub histogram_bins: usize,
    pub enabled: Vec<charts::ChartKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub blue_color: String,
    pub red_color: String,
    pub q1_color: String,
    pub median_color: String,
    pub q3_color: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: DataConfig {
                csv_path: "data/LeagueofLegends.csv".to_string(),
            },
            columns: ColumnConfig {
                duration: "gamelength".to_string(),
                blue_won: "bResult".to_string(),
                red_won: "rResult".to_string(),
                region: "League".to_string(),
                resource_diff: "golddiff".to_string(),
            },
            buckets: BucketConfig {
                lower: -5000.0,
                upper: 5000.0,
                width: 500.0,
            },
            charts: ChartConfig {
                output_dir: "images".to_string(),
                format: charts::ChartFormat::Png,
                width: 1200,
                height: 800,
                histogram_bins: 50,
                enabled: charts::ChartKind::ALL.to_vec(),
            },
            style: StyleConfig {
                blue_color: "#0072B2".to_string(),
                red_color: "#FF2400".to_string(),
                q1_color: "#FF2400".to_string(),
                median_color: "#008000".to_string(),
                q3_color: "#FFA500".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StatsError::Config(format!("Failed to read config file {}: {}", path, e))
        })?;
        toml::from_str(&content)
            .map_err(|e| StatsError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| StatsError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
