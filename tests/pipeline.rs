use matchstats::charts::{ChartFormat, ChartKind};
use matchstats::data::RecordLoader;
use matchstats::features::wins_by_region;
use matchstats::pipeline::Pipeline;
use matchstats::{Config, StatsError};
use std::path::Path;

const MATCHES: &str = "\
League,Year,bResult,rResult,gamelength,golddiff
NA,2015,1,0,30,\"[100,-200,300]\"
NA,2015,0,1,45,[]
EU,2016,1,0,abc,\"[0,1]\"
EU,2016,0,1,35,\"[0, -500, -1200]\"
LCK,2017,1,0,28,not a list
LCK,2017,0,1,40,\"[0, 2000, 750]\"
";

fn write_csv(dir: &Path, contents: &str) -> String {
    let path = dir.join("matches.csv");
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

fn config_for(csv_path: String, format: ChartFormat) -> Config {
    let mut config = Config::default();
    config.data.csv_path = csv_path;
    config.charts.format = format;
    config.charts.width = 640;
    config.charts.height = 480;
    config
}

#[test]
fn test_full_run_writes_all_charts() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), MATCHES);
    let out = dir.path().join("images");

    let pipeline = Pipeline::new(config_for(csv, ChartFormat::Svg)).unwrap();
    let run = pipeline.run(&out).unwrap();

    assert_eq!(run.load.total_rows, 6);
    assert_eq!(run.load.loaded, 5);
    assert_eq!(run.load.rejected, 1);
    assert_eq!(run.normalize.kept, 3);
    assert_eq!(run.normalize.dropped, 2);
    assert!(!run.generated_at.is_empty());

    assert_eq!(run.charts.len(), 6);
    for kind in ChartKind::ALL {
        let path = out.join(format!("{}.svg", kind.file_stem()));
        assert!(path.exists(), "missing {}", path.display());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}

#[test]
fn test_default_config_renders_all_png_charts() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), MATCHES);
    let out = dir.path().join("images");

    let mut config = Config::default();
    config.data.csv_path = csv;
    assert_eq!(config.charts.format, ChartFormat::Png);
    let pipeline = Pipeline::new(config).unwrap();
    let run = pipeline.run(&out).unwrap();

    let expected: Vec<_> = ChartKind::ALL
        .iter()
        .map(|kind| out.join(format!("{}.png", kind.file_stem())))
        .collect();
    assert_eq!(run.charts, expected);
    for path in &run.charts {
        let bytes = std::fs::read(path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n", "{}", path.display());
    }
}

#[test]
fn test_png_subset() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), MATCHES);
    let out = dir.path().join("png");

    let mut config = config_for(csv, ChartFormat::Png);
    config.charts.enabled = vec![ChartKind::WinComparison, ChartKind::GoldHistogram];
    let pipeline = Pipeline::new(config).unwrap();
    let run = pipeline.run(&out).unwrap();

    assert_eq!(
        run.charts,
        vec![
            out.join("win_comparison.png"),
            out.join("gold_difference_histogram.png")
        ]
    );
    assert!(!out.join("scatter_gold_difference.png").exists());
}

#[test]
fn test_oversized_bucket_layout_rejected() {
    let mut config = Config::default();
    config.buckets.width = 1e-12;
    assert!(matches!(
        Pipeline::new(config),
        Err(StatsError::InvalidBuckets(_))
    ));
}

#[test]
fn test_summary_tables() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), MATCHES);

    let pipeline = Pipeline::new(config_for(csv, ChartFormat::Svg)).unwrap();
    let prepared = pipeline.prepare().unwrap();
    let summary = pipeline.summarize(&prepared);

    let regions: Vec<_> = summary
        .regions
        .iter()
        .map(|g| (g.region.as_str(), g.tally.blue_wins, g.tally.red_wins))
        .collect();
    assert_eq!(regions, vec![("EU", 0, 1), ("LCK", 0, 1), ("NA", 1, 0)]);

    // 300 blue lead, blue won; -1200 red lead, red won; 750 blue lead, red won
    assert_eq!(summary.expected, 2);
    assert_eq!(summary.unexpected, 1);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["normalize"]["dropped"], 2);
    assert_eq!(json["regions"][2]["region"], "NA");
    assert_eq!(json["regions"][2]["blue_wins"], 1);
}

#[test]
fn test_decode_drop_excluded_from_region_counts() {
    let csv = "\
League,bResult,rResult,gamelength,golddiff
NA,1,0,30,\"[100,-200,300]\"
NA,0,1,45,[]
";
    let loader = RecordLoader::new(Config::default().columns);
    let (records, report) = loader.load_reader(csv.as_bytes()).unwrap();
    assert_eq!(report.loaded, 2);

    let prepared = Pipeline::prepare_records(records, report);
    let groups = wins_by_region(&prepared.records);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].tally.blue_wins, 1);
    assert_eq!(groups[0].tally.red_wins, 0);
}

#[test]
fn test_missing_column_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), "League,bResult,rResult,golddiff\nNA,1,0,[1]\n");

    let pipeline = Pipeline::new(config_for(csv, ChartFormat::Svg)).unwrap();
    match pipeline.run(&dir.path().join("out")) {
        Err(StatsError::MissingColumns(cols)) => assert_eq!(cols, vec!["gamelength"]),
        other => panic!("expected missing column error, got {:?}", other.map(|r| r.charts)),
    }
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.csv").to_string_lossy().into_owned();

    let pipeline = Pipeline::new(config_for(missing, ChartFormat::Svg)).unwrap();
    assert!(matches!(
        pipeline.run(&dir.path().join("out")),
        Err(StatsError::Io(_))
    ));
}
