//! Feature extraction and aggregation
//!
//! Turns loaded match rows into the grouped statistics each chart consumes.

pub mod aggregate;
pub mod distribution;
pub mod normalize;
pub mod outcome;
pub mod sequence;

pub use aggregate::{
    win_rate_by_bucket, wins_by_duration, wins_by_region, Bucket, BucketRate, BucketSpec,
    DurationWins, RegionWins, WinTally, MAX_BUCKETS,
};
pub use distribution::{ecdf, DurationSummary, Histogram};
pub use normalize::{normalize, NormalizeReport, Normalized};
pub use outcome::{classify, is_expected, is_unexpected, split_outcomes, Outcome, OutcomeSplit};
pub use sequence::{decode_sequence, final_value, DecodeError};
