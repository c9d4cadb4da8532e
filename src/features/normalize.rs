//! Reduces each record's gold difference series to its final sample
//!
//! Records whose series does not decode (or is empty) are dropped here and
//! never reach aggregation; only the drop count leaves this module.

use crate::features::sequence::decode_sequence;
use crate::MatchRecord;
use serde::Serialize;

/// Counts from a normalization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub input: usize,
    pub kept: usize,
    pub dropped: usize,
}

/// Records with a final gold difference, plus what it cost to get them
#[derive(Debug, Clone)]
pub struct Normalized {
    pub records: Vec<MatchRecord>,
    pub report: NormalizeReport,
}

/// Fill in `resource_diff` for every record and drop the ones that fail.
pub fn normalize(records: Vec<MatchRecord>) -> Normalized {
    let input = records.len();
    let mut kept = Vec::with_capacity(input);

    for (row, mut record) in records.into_iter().enumerate() {
        match decode_sequence(&record.resource_diff_raw) {
            Ok(values) => match values.last() {
                Some(&last) => {
                    record.resource_diff = Some(last);
                    kept.push(record);
                }
                None => log::debug!("Record {}: empty gold difference series", row),
            },
            Err(e) => log::debug!("Record {}: dropped gold difference: {}", row, e),
        }
    }

    let report = NormalizeReport {
        input,
        kept: kept.len(),
        dropped: input - kept.len(),
    };
    log::info!(
        "Normalized {} records ({} dropped on gold difference)",
        report.kept,
        report.dropped
    );

    Normalized {
        records: kept,
        report,
    }
}
