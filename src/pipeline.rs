//! End-to-end run: load, normalize, aggregate, render
//!
//! Every aggregation is recomputed from the normalized record set for the
//! chart that needs it; charts share nothing but that read-only slice.

use crate::charts::{
    self, ChartKind, ChartStyle, DurationDistributionChart, GoldHistogramChart, GoldScatterChart,
    WinComparisonChart, WinRateChart, WinsByDurationChart,
};
use crate::data::{LoadReport, RecordLoader};
use crate::features::{
    ecdf, normalize, split_outcomes, win_rate_by_bucket, wins_by_duration, wins_by_region,
    BucketRate, BucketSpec, DurationSummary, DurationWins, Histogram, NormalizeReport, RegionWins,
};
use crate::{Config, MatchRecord, Result, Side};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Normalized records and the row accounting that produced them
#[derive(Debug, Clone)]
pub struct Prepared {
    pub records: Vec<MatchRecord>,
    pub load: LoadReport,
    pub normalize: NormalizeReport,
}

/// Aggregate tables for reporting without rendering
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub load: LoadReport,
    pub normalize: NormalizeReport,
    pub durations: Option<DurationSummary>,
    pub regions: Vec<RegionWins>,
    pub by_duration: Vec<DurationWins>,
    pub win_rates: Vec<BucketRate>,
    pub expected: usize,
    pub unexpected: usize,
    /// Share of decided matches won by the side behind on gold
    pub upset_rate: Option<f64>,
}

/// Result of a full run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: String,
    pub load: LoadReport,
    pub normalize: NormalizeReport,
    pub charts: Vec<PathBuf>,
}

pub struct Pipeline {
    config: Config,
    buckets: BucketSpec,
    style: ChartStyle,
}

impl Pipeline {
    /// Validate bucket layout and chart style up front
    pub fn new(config: Config) -> Result<Self> {
        let buckets = BucketSpec::from_config(&config.buckets)?;
        let style = ChartStyle::from_config(&config.charts, &config.style)?;
        Ok(Pipeline {
            config,
            buckets,
            style,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the configured CSV and normalize it
    pub fn prepare(&self) -> Result<Prepared> {
        let loader = RecordLoader::new(self.config.columns.clone());
        let (records, load) = loader.load_path(&self.config.data.csv_path)?;
        Ok(Self::prepare_records(records, load))
    }

    /// Normalize already-loaded records
    pub fn prepare_records(records: Vec<MatchRecord>, load: LoadReport) -> Prepared {
        let normalized = normalize(records);
        if normalized.records.is_empty() {
            log::warn!("No records survived gold difference normalization");
        }
        Prepared {
            records: normalized.records,
            load,
            normalize: normalized.report,
        }
    }

    pub fn summarize(&self, prepared: &Prepared) -> Summary {
        let records = &prepared.records;
        let durations: Vec<f64> = records.iter().map(|r| r.duration).collect();
        let split = split_outcomes(records);

        Summary {
            load: prepared.load,
            normalize: prepared.normalize,
            durations: DurationSummary::from_durations(&durations),
            regions: wins_by_region(records),
            by_duration: wins_by_duration(records),
            win_rates: win_rate_by_bucket(records, &self.buckets),
            expected: split.expected.len(),
            unexpected: split.unexpected.len(),
            upset_rate: split.upset_rate(),
        }
    }

    /// Render every enabled chart into `out_dir`, creating it if needed.
    pub fn render(&self, records: &[MatchRecord], out_dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(out_dir)?;

        let mut written = Vec::new();
        for &kind in &self.config.charts.enabled {
            if let Some(path) = self.render_kind(kind, records, out_dir)? {
                written.push(path);
            }
        }
        Ok(written)
    }

    /// Render one chart; None when its input is empty and nothing was drawn
    pub fn render_kind(
        &self,
        kind: ChartKind,
        records: &[MatchRecord],
        out_dir: &Path,
    ) -> Result<Option<PathBuf>> {
        let style = &self.style;
        let path = match kind {
            ChartKind::DurationDistribution => {
                let durations: Vec<f64> = records.iter().map(|r| r.duration).collect();
                let Some(summary) = DurationSummary::from_durations(&durations) else {
                    log::warn!("Skipping {}: no match lengths", kind);
                    return Ok(None);
                };
                let points = ecdf(&durations);
                let chart = DurationDistributionChart {
                    summary: &summary,
                    ecdf: &points,
                };
                charts::render(&chart, out_dir, style)?
            }
            ChartKind::WinComparison => {
                let groups = wins_by_region(records);
                charts::render(&WinComparisonChart { groups: &groups }, out_dir, style)?
            }
            ChartKind::WinsByDuration => {
                let groups = wins_by_duration(records);
                charts::render(&WinsByDurationChart { groups: &groups }, out_dir, style)?
            }
            ChartKind::WinRateByGold => {
                let rates = win_rate_by_bucket(records, &self.buckets);
                let last = self.buckets.bucket(self.buckets.len() - 1);
                let chart = WinRateChart {
                    rates: &rates,
                    range: (self.buckets.bucket(0).lower, last.upper),
                };
                charts::render(&chart, out_dir, style)?
            }
            ChartKind::GoldHistogram => {
                let diffs = |side: Side| -> Vec<f64> {
                    records
                        .iter()
                        .filter(|r| r.won(side))
                        .filter_map(|r| r.resource_diff)
                        .collect()
                };
                let blue = Histogram::from_values(&diffs(Side::Blue), style.histogram_bins);
                let red = Histogram::from_values(&diffs(Side::Red), style.histogram_bins);
                let chart = GoldHistogramChart {
                    blue: blue.as_ref(),
                    red: red.as_ref(),
                };
                charts::render(&chart, out_dir, style)?
            }
            ChartKind::GoldScatter => {
                let split = split_outcomes(records);
                let chart = GoldScatterChart {
                    all: records,
                    split: &split,
                };
                charts::render(&chart, out_dir, style)?
            }
        };
        Ok(Some(path))
    }

    /// Load, normalize and render into `out_dir`
    pub fn run(&self, out_dir: &Path) -> Result<RunSummary> {
        let prepared = self.prepare()?;
        let charts = self.render(&prepared.records, out_dir)?;
        log::info!("Rendered {} charts into {}", charts.len(), out_dir.display());

        Ok(RunSummary {
            generated_at: chrono::Utc::now().to_rfc3339(),
            load: prepared.load,
            normalize: prepared.normalize,
            charts,
        })
    }
}
