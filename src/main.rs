//! Match statistics CLI
//!
//! Loads match records from CSV and renders win and gold difference charts.

use clap::{Parser, Subcommand};
use matchstats::charts::ChartFormat;
use matchstats::{Config, Result};

#[derive(Parser)]
#[command(name = "matchstats")]
#[command(about = "Win and gold difference statistics for competitive matches", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "matchstats.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, aggregate and render every enabled chart
    Render {
        /// Override the input CSV
        #[arg(long)]
        data: Option<String>,
        /// Override the output directory
        #[arg(long)]
        out: Option<String>,
        /// Image format (png or svg)
        #[arg(long)]
        format: Option<ChartFormat>,
    },
    /// Print load reports and aggregation tables without rendering
    Summary {
        /// Override the input CSV
        #[arg(long)]
        data: Option<String>,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Write a default config file
    Init,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table or json.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Render { data, out, format } => commands::render(config, data, out, format),
        Commands::Summary { data, format } => commands::summary(config, data, format),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use matchstats::pipeline::{Pipeline, Summary};
    use std::path::Path;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        println!("\nNext steps:");
        println!("  1. Edit {} to point [data] csv_path at your match table", config_path);
        println!("  2. Run 'matchstats summary' to check the data loads");
        println!("  3. Run 'matchstats render' to write the charts");

        Ok(())
    }

    pub fn render(
        mut config: Config,
        data: Option<String>,
        out: Option<String>,
        format: Option<ChartFormat>,
    ) -> Result<()> {
        if let Some(path) = data {
            config.data.csv_path = path;
        }
        if let Some(dir) = out {
            config.charts.output_dir = dir;
        }
        if let Some(format) = format {
            config.charts.format = format;
        }

        let pipeline = Pipeline::new(config)?;
        let run = pipeline.run(Path::new(&pipeline.config().charts.output_dir))?;

        println!("Render complete ({})", run.generated_at);
        println!("───────────────────────────────");
        println!("  Rows read:      {}", run.load.total_rows);
        println!("  Rows rejected:  {}", run.load.rejected);
        println!("  Decode drops:   {}", run.normalize.dropped);
        println!("  Matches used:   {}", run.normalize.kept);
        println!("\nCharts:");
        for path in &run.charts {
            println!("  {}", path.display());
        }

        Ok(())
    }

    pub fn summary(mut config: Config, data: Option<String>, format: OutputFormat) -> Result<()> {
        if let Some(path) = data {
            config.data.csv_path = path;
        }

        let pipeline = Pipeline::new(config)?;
        let prepared = pipeline.prepare()?;
        let summary = pipeline.summarize(&prepared);

        match format {
            OutputFormat::Table => print_tables(&summary),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        }

        Ok(())
    }

    fn print_tables(summary: &Summary) {
        println!("Data");
        println!("───────────────────────────────");
        println!("  Rows read:      {}", summary.load.total_rows);
        println!("  Loaded:         {}", summary.load.loaded);
        println!("  Rejected:       {}", summary.load.rejected);
        println!("  Decode drops:   {}", summary.normalize.dropped);
        println!("  Matches used:   {}", summary.normalize.kept);

        if let Some(d) = &summary.durations {
            println!("\nGame length (minutes)");
            println!("───────────────────────────────");
            println!(
                "  min {:.1}  q1 {:.1}  median {:.1}  q3 {:.1}  max {:.1}",
                d.min, d.q1, d.median, d.q3, d.max
            );
            println!("  mean {:.2}  iqr {:.1}  outliers {}", d.mean, d.iqr(), d.outliers);
        }

        println!(
            "\n{:<16} {:>8} {:>8} {:>8} {:>7}",
            "Region", "Blue", "Red", "Red-Blue", "Leader"
        );
        println!("{}", "─".repeat(51));
        for group in &summary.regions {
            println!(
                "{:<16} {:>8} {:>8} {:>8} {:>7}",
                group.region,
                group.tally.blue_wins,
                group.tally.red_wins,
                group.tally.difference(),
                group.tally.leading_side().to_string()
            );
        }

        println!(
            "\n{:<20} {:>8} {:>10} {:>10}",
            "Gold difference", "Matches", "Blue rate", "Red rate"
        );
        println!("{}", "─".repeat(51));
        for rate in &summary.win_rates {
            println!(
                "{:<20} {:>8} {:>10.3} {:>10.3}",
                rate.bucket.to_string(),
                rate.matches,
                rate.blue_rate,
                rate.red_rate
            );
        }

        let classified = summary.expected + summary.unexpected;
        println!(
            "\nGold lead held:   {} of {} decided matches",
            summary.expected, classified
        );
        match summary.upset_rate {
            Some(rate) => println!(
                "Upsets:           {} ({:.1}%)",
                summary.unexpected,
                rate * 100.0
            ),
            None => println!("Upsets:           {}", summary.unexpected),
        }
        println!("Distinct lengths: {}", summary.by_duration.len());
    }
}
