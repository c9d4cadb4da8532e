//! Expected vs. unexpected results relative to the final gold lead

use crate::{MatchRecord, Side};
use serde::Serialize;
use std::fmt;

/// Whether the side ahead on gold also won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The side with the gold lead won
    Expected,
    /// The side behind on gold won
    Unexpected,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Expected => write!(f, "Expected"),
            Outcome::Unexpected => write!(f, "Unexpected"),
        }
    }
}

pub fn is_expected(record: &MatchRecord) -> bool {
    record
        .gold_leader()
        .is_some_and(|leader| record.won(leader))
}

pub fn is_unexpected(record: &MatchRecord) -> bool {
    match record.gold_leader() {
        Some(Side::Blue) => record.red_won,
        Some(Side::Red) => record.blue_won,
        None => false,
    }
}

/// Classify a record; a level or missing gold difference has no outcome
pub fn classify(record: &MatchRecord) -> Option<Outcome> {
    if is_expected(record) {
        Some(Outcome::Expected)
    } else if is_unexpected(record) {
        Some(Outcome::Unexpected)
    } else {
        None
    }
}

/// Records split by outcome, borrowed from the normalized set
#[derive(Debug, Clone, Default)]
pub struct OutcomeSplit<'a> {
    pub expected: Vec<&'a MatchRecord>,
    pub unexpected: Vec<&'a MatchRecord>,
}

impl<'a> OutcomeSplit<'a> {
    /// Share of classified matches won by the side behind on gold
    pub fn upset_rate(&self) -> Option<f64> {
        let total = self.expected.len() + self.unexpected.len();
        if total == 0 {
            None
        } else {
            Some(self.unexpected.len() as f64 / total as f64)
        }
    }
}

pub fn split_outcomes(records: &[MatchRecord]) -> OutcomeSplit<'_> {
    let mut split = OutcomeSplit::default();
    for record in records {
        if is_expected(record) {
            split.expected.push(record);
        }
        if is_unexpected(record) {
            split.unexpected.push(record);
        }
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_match(blue_won: bool, diff: f64) -> MatchRecord {
        let mut m = MatchRecord::new(30.0, blue_won, !blue_won, "NA", "");
        m.resource_diff = Some(diff);
        m
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&make_match(true, 1200.0)), Some(Outcome::Expected));
        assert_eq!(classify(&make_match(false, -300.0)), Some(Outcome::Expected));
        assert_eq!(classify(&make_match(false, 800.0)), Some(Outcome::Unexpected));
        assert_eq!(classify(&make_match(true, -50.0)), Some(Outcome::Unexpected));
        assert_eq!(classify(&make_match(true, 0.0)), None);
        assert_eq!(classify(&make_match(false, 0.0)), None);
    }

    #[test]
    fn test_unnormalized_record_has_no_outcome() {
        let m = MatchRecord::new(30.0, true, false, "NA", "[1]");
        assert!(!is_expected(&m));
        assert!(!is_unexpected(&m));
    }

    #[test]
    fn test_split_partitions_nonzero_records() {
        let records: Vec<_> = (-10..=10)
            .flat_map(|d| [make_match(true, d as f64 * 100.0), make_match(false, d as f64 * 100.0)])
            .collect();
        let split = split_outcomes(&records);

        let nonzero = records.iter().filter(|r| r.resource_diff != Some(0.0)).count();
        assert_eq!(split.expected.len() + split.unexpected.len(), nonzero);
        for r in &split.expected {
            assert!(!split.unexpected.iter().any(|u| std::ptr::eq(*u, *r)));
            assert_ne!(r.resource_diff, Some(0.0));
        }
        assert_eq!(split.upset_rate(), Some(0.5));
    }

    #[test]
    fn test_upset_rate_empty() {
        assert_eq!(split_outcomes(&[]).upset_rate(), None);
    }
}
