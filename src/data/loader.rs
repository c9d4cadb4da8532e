//! CSV loading for match records
//!
//! Maps configured column names onto [`MatchRecord`] fields. Rows with
//! unparseable or missing required fields are rejected and counted; a
//! missing column or an unreadable file aborts the load.

use crate::{ColumnConfig, MatchRecord, Result, StatsError};
use csv::StringRecord;
use serde::Serialize;
use std::io::Read;
use std::path::Path;

/// Row counts from a single load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded: usize,
    pub rejected: usize,
}

/// Why a row was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
enum RowError {
    Missing(&'static str),
    Invalid { field: &'static str, value: String },
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowError::Missing(field) => write!(f, "missing {}", field),
            RowError::Invalid { field, value } => write!(f, "invalid {} value '{}'", field, value),
        }
    }
}

/// Column positions resolved against the header row
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    duration: usize,
    blue_won: usize,
    red_won: usize,
    region: usize,
    resource_diff: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, columns: &ColumnConfig) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let wanted = [
            &columns.duration,
            &columns.blue_won,
            &columns.red_won,
            &columns.region,
            &columns.resource_diff,
        ];
        let missing: Vec<String> = wanted
            .iter()
            .filter(|name| find(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(StatsError::MissingColumns(missing));
        }

        // All present, checked above
        let idx = |name: &str| find(name).unwrap_or_default();
        Ok(ColumnIndex {
            duration: idx(&columns.duration),
            blue_won: idx(&columns.blue_won),
            red_won: idx(&columns.red_won),
            region: idx(&columns.region),
            resource_diff: idx(&columns.resource_diff),
        })
    }
}

/// Loads match records from CSV files
pub struct RecordLoader {
    columns: ColumnConfig,
}

impl RecordLoader {
    pub fn new(columns: ColumnConfig) -> Self {
        RecordLoader { columns }
    }

    /// Load all records from a CSV file on disk
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<(Vec<MatchRecord>, LoadReport)> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e))
        })?;
        let (records, report) = self.load_reader(file)?;
        log::info!(
            "Loaded {} of {} rows from {} ({} rejected)",
            report.loaded,
            report.total_rows,
            path.display(),
            report.rejected
        );
        if records.is_empty() {
            return Err(StatsError::EmptyDataset(path.display().to_string()));
        }
        Ok((records, report))
    }

    /// Load all records from any CSV reader (header row required)
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<(Vec<MatchRecord>, LoadReport)> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let index = ColumnIndex::resolve(&headers, &self.columns)?;

        let mut records = Vec::new();
        let mut report = LoadReport::default();

        for (row, result) in csv_reader.records().enumerate() {
            report.total_rows += 1;
            // Header is line 1
            let line = row + 2;

            let raw = match result {
                Ok(raw) => raw,
                Err(e) => {
                    report.rejected += 1;
                    log::warn!("Line {}: unreadable row: {}", line, e);
                    continue;
                }
            };

            match parse_row(&raw, &index) {
                Ok(record) => {
                    report.loaded += 1;
                    records.push(record);
                }
                Err(e) => {
                    report.rejected += 1;
                    log::warn!("Line {}: rejected row: {}", line, e);
                }
            }
        }

        Ok((records, report))
    }
}

fn field<'a>(
    raw: &'a StringRecord,
    idx: usize,
    name: &'static str,
) -> std::result::Result<&'a str, RowError> {
    match raw.get(idx).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(RowError::Missing(name)),
    }
}

fn parse_flag(value: &str, name: &'static str) -> std::result::Result<bool, RowError> {
    match value {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(RowError::Invalid {
            field: name,
            value: other.to_string(),
        }),
    }
}

fn parse_row(
    raw: &StringRecord,
    index: &ColumnIndex,
) -> std::result::Result<MatchRecord, RowError> {
    let duration_str = field(raw, index.duration, "duration")?;
    let duration = match duration_str.parse::<f64>() {
        Ok(d) if d.is_finite() && d >= 0.0 => d,
        _ => {
            return Err(RowError::Invalid {
                field: "duration",
                value: duration_str.to_string(),
            })
        }
    };

    let blue_won = parse_flag(field(raw, index.blue_won, "blue result")?, "blue result")?;
    let red_won = parse_flag(field(raw, index.red_won, "red result")?, "red result")?;
    // Checked for emptiness but kept untrimmed
    let region = raw
        .get(index.region)
        .filter(|r| !r.trim().is_empty())
        .ok_or(RowError::Missing("region"))?;

    // An empty gold difference cell is left for the normalizer to drop
    let resource_diff_raw = raw
        .get(index.resource_diff)
        .ok_or(RowError::Missing("gold difference"))?;

    Ok(MatchRecord::new(duration, blue_won, red_won, region, resource_diff_raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    fn loader() -> RecordLoader {
        RecordLoader::new(Config::default().columns)
    }

    #[test]
    fn test_load_valid_rows() {
        let csv = "League,gamelength,bResult,rResult,golddiff\n\
                   NALCS,40,1,0,\"[0, 120, 300]\"\n\
                   LCK,32,0,1,\"[0, -50]\"\n";
        let (records, report) = loader().load_reader(csv.as_bytes()).unwrap();

        assert_eq!(report, LoadReport { total_rows: 2, loaded: 2, rejected: 0 });
        assert_eq!(records[0].region, "NALCS");
        assert_eq!(records[0].duration, 40.0);
        assert!(records[0].blue_won);
        assert!(!records[0].red_won);
        assert_eq!(records[0].resource_diff_raw, "[0, 120, 300]");
        assert_eq!(records[0].resource_diff, None);
        assert!(records[1].red_won);
    }

    #[test]
    fn test_malformed_rows_are_counted() {
        let csv = "League,gamelength,bResult,rResult,golddiff\n\
                   NA,abc,1,0,[1]\n\
                   NA,30,2,0,[1]\n\
                   NA,-5,1,0,[1]\n\
                   ,30,1,0,[1]\n\
                   NA,30,1\n\
                   NA,30,0,1,[1]\n";
        let (records, report) = loader().load_reader(csv.as_bytes()).unwrap();

        assert_eq!(report.total_rows, 6);
        assert_eq!(report.loaded, 1);
        assert_eq!(report.rejected, 5);
        assert_eq!(records.len(), 1);
        assert!(records[0].red_won);
    }

    #[test]
    fn test_empty_golddiff_is_kept_for_normalizer() {
        let csv = "League,gamelength,bResult,rResult,golddiff\nNA,30,1,0,\n";
        let (records, report) = loader().load_reader(csv.as_bytes()).unwrap();
        assert_eq!(report.loaded, 1);
        assert_eq!(records[0].resource_diff_raw, "");
    }

    #[test]
    fn test_region_kept_verbatim() {
        let csv = "League,gamelength,bResult,rResult,golddiff\n\" na \",30,1,0,[1]\n";
        let (records, _) = loader().load_reader(csv.as_bytes()).unwrap();
        assert_eq!(records[0].region, " na ");
    }

    #[test]
    fn test_missing_columns_is_fatal() {
        let csv = "League,gamelength,bResult\nNA,30,1\n";
        let err = loader().load_reader(csv.as_bytes()).unwrap_err();
        match err {
            StatsError::MissingColumns(cols) => {
                assert_eq!(cols, vec!["rResult".to_string(), "golddiff".to_string()]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_custom_column_names() {
        let mut columns = Config::default().columns;
        columns.region = "region".to_string();
        columns.resource_diff = "gold".to_string();
        let csv = "region,gamelength,bResult,rResult,gold\nEU,25.5,0,1,[3]\n";
        let (records, _) = RecordLoader::new(columns).load_reader(csv.as_bytes()).unwrap();
        assert_eq!(records[0].region, "EU");
        assert_eq!(records[0].duration, 25.5);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = loader().load_path("/nonexistent/matches.csv").unwrap_err();
        assert!(matches!(err, StatsError::Io(_)));
    }

    #[test]
    fn test_all_rows_rejected_is_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "League,gamelength,bResult,rResult,golddiff\nNA,x,1,0,[1]\n").unwrap();
        let err = loader().load_path(&path).unwrap_err();
        assert!(matches!(err, StatsError::EmptyDataset(_)));
    }
}
