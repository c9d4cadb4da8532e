//! Grouped win statistics
//!
//! Sums of blue/red wins per region and per exact match length, and mean
//! win rates per gold difference bucket. Each grouping is a pure function
//! over the normalized record set.

use crate::{BucketConfig, MatchRecord, Result, Side, StatsError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Blue and red win counts for one group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WinTally {
    pub blue_wins: u32,
    pub red_wins: u32,
}

impl WinTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one match result
    pub fn update(&mut self, record: &MatchRecord) {
        self.blue_wins += record.blue_won as u32;
        self.red_wins += record.red_won as u32;
    }

    pub fn total(&self) -> u32 {
        self.blue_wins + self.red_wins
    }

    /// Red wins minus blue wins
    pub fn difference(&self) -> i64 {
        self.red_wins as i64 - self.blue_wins as i64
    }

    /// Side with more wins; ties go to red
    pub fn leading_side(&self) -> Side {
        if self.difference() < 0 {
            Side::Blue
        } else {
            Side::Red
        }
    }
}

/// Wins for one region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionWins {
    pub region: String,
    #[serde(flatten)]
    pub tally: WinTally,
}

/// Wins for one exact match length
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationWins {
    pub duration: f64,
    #[serde(flatten)]
    pub tally: WinTally,
}

/// Sum wins per region, in lexicographic region order.
pub fn wins_by_region(records: &[MatchRecord]) -> Vec<RegionWins> {
    let mut groups: BTreeMap<&str, WinTally> = BTreeMap::new();
    for record in records {
        groups.entry(record.region.as_str()).or_default().update(record);
    }

    groups
        .into_iter()
        .map(|(region, tally)| RegionWins {
            region: region.to_string(),
            tally,
        })
        .collect()
}

/// Sum wins per exact duration value, ascending.
pub fn wins_by_duration(records: &[MatchRecord]) -> Vec<DurationWins> {
    let mut sorted: Vec<&MatchRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.duration.total_cmp(&b.duration));

    let mut groups: Vec<DurationWins> = Vec::new();
    for record in sorted {
        match groups.last_mut() {
            Some(last) if last.duration == record.duration => last.tally.update(record),
            _ => {
                let mut tally = WinTally::new();
                tally.update(record);
                groups.push(DurationWins {
                    duration: record.duration,
                    tally,
                });
            }
        }
    }
    groups
}

/// Half-open interval `[lower, upper)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bucket {
    pub lower: f64,
    pub upper: f64,
}

impl Bucket {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value < self.upper
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.lower, self.upper)
    }
}

/// Upper limit on the number of buckets a layout may produce
pub const MAX_BUCKETS: usize = 10_000;

/// Contiguous equal-width buckets covering `[lower, upper)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketSpec {
    lower: f64,
    upper: f64,
    width: f64,
    count: usize,
}

impl Default for BucketSpec {
    fn default() -> Self {
        BucketSpec {
            lower: -5000.0,
            upper: 5000.0,
            width: 500.0,
            count: 20,
        }
    }
}

impl BucketSpec {
    pub fn new(lower: f64, upper: f64, width: f64) -> Result<Self> {
        if !(lower.is_finite() && upper.is_finite() && width.is_finite()) {
            return Err(StatsError::InvalidBuckets(
                "bounds and width must be finite".to_string(),
            ));
        }
        if width <= 0.0 {
            return Err(StatsError::InvalidBuckets(format!(
                "width must be positive, got {}",
                width
            )));
        }
        if lower >= upper {
            return Err(StatsError::InvalidBuckets(format!(
                "lower bound {} must be below upper bound {}",
                lower, upper
            )));
        }

        let ratio = (upper - lower) / width;
        if !(ratio <= MAX_BUCKETS as f64) {
            return Err(StatsError::InvalidBuckets(format!(
                "width {} over [{}, {}) gives more than {} buckets",
                width, lower, upper, MAX_BUCKETS
            )));
        }
        // Snap ratios that land a rounding error past a whole number
        let nearest = ratio.round();
        let count = if (ratio - nearest).abs() <= 1e-9 * nearest.max(1.0) {
            nearest
        } else {
            ratio.ceil()
        };
        let count = (count as usize).max(1);

        Ok(BucketSpec {
            lower,
            upper,
            width,
            count,
        })
    }

    pub fn from_config(config: &BucketConfig) -> Result<Self> {
        Self::new(config.lower, config.upper, config.width)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Bucket `i`; the last bucket always ends at the upper bound
    pub fn bucket(&self, i: usize) -> Bucket {
        let lower = self.lower + i as f64 * self.width;
        let upper = if i + 1 >= self.count {
            self.upper
        } else {
            (lower + self.width).min(self.upper)
        };
        Bucket { lower, upper }
    }

    /// Index of the bucket holding `value`, or None outside `[lower, upper)`.
    ///
    /// A value on a boundary belongs to the bucket it is the lower edge of.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        if !(value >= self.lower && value < self.upper) {
            return None;
        }
        let mut idx = ((value - self.lower) / self.width).floor() as usize;
        idx = idx.min(self.count - 1);

        // Correct for rounding right at an edge
        if value < self.bucket(idx).lower && idx > 0 {
            idx -= 1;
        } else if value >= self.bucket(idx).upper && idx + 1 < self.count {
            idx += 1;
        }
        Some(idx)
    }
}

/// Mean win rates for one gold difference bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketRate {
    pub bucket: Bucket,
    pub matches: usize,
    pub blue_rate: f64,
    pub red_rate: f64,
}

/// Mean blue/red win rate per gold difference bucket.
///
/// Records without a final gold difference, or outside the bucket range,
/// are skipped. Empty buckets are omitted rather than reported as zero.
pub fn win_rate_by_bucket(records: &[MatchRecord], spec: &BucketSpec) -> Vec<BucketRate> {
    let mut tallies = vec![(0usize, WinTally::new()); spec.len()];

    for record in records {
        if let Some(idx) = record.resource_diff.and_then(|d| spec.index_of(d)) {
            let (matches, tally) = &mut tallies[idx];
            *matches += 1;
            tally.update(record);
        }
    }

    tallies
        .into_iter()
        .enumerate()
        .filter_map(|(i, (matches, tally))| {
            let bucket = spec.bucket(i);
            if matches == 0 {
                log::debug!("Gold difference bucket {} is empty, omitted", bucket);
                return None;
            }
            Some(BucketRate {
                bucket,
                matches,
                blue_rate: tally.blue_wins as f64 / matches as f64,
                red_rate: tally.red_wins as f64 / matches as f64,
            })
        })
        .collect()
}
