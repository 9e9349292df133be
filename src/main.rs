//! CLI entry point for the sales insights tool.
//!
//! `etl` runs the offline batch pipeline; `report`, `export` and `forecast`
//! read the cleaned file once and answer dashboard queries over it.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use sales_insights::{
    SalesTable,
    config::Settings,
    etl,
    forecast::{LinearTrend, forecast},
    output::{print_json, print_pretty, print_report, write_forecast},
    report::{SalesFilter, build_report, export_csv, filter},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "sales_insights")]
#[command(about = "Sales ETL and dashboard analytics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a raw sales CSV: parse dates, add TotalPrice, drop incomplete rows
    Etl {
        /// Raw CSV to read (defaults to SALES_RAW_PATH)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Cleaned CSV to write (defaults to SALES_CLEAN_PATH)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show KPIs, trends, top products and insights for a selection
    Report {
        /// Cleaned CSV to read (defaults to SALES_CLEAN_PATH)
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Number of top products to list (defaults to SALES_TOP_N)
        #[arg(short, long)]
        top: Option<usize>,

        /// Print the whole report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write the filtered rows to <NAME>.csv
    Export {
        /// Cleaned CSV to read (defaults to SALES_CLEAN_PATH)
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        selection: SelectionArgs,

        /// File name without the .csv extension
        #[arg(short, long, default_value = "sales_report")]
        name: String,

        /// Directory to write into
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
    /// Project daily sales forward with confidence bounds
    Forecast {
        /// Cleaned CSV to read (defaults to SALES_CLEAN_PATH)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Days to project past the last observed date (defaults to SALES_FORECAST_HORIZON_DAYS)
        #[arg(long)]
        horizon: Option<u32>,

        /// Optional: CSV file to write the projection to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Sidebar filters. Omitted options select everything in the table.
#[derive(Args)]
struct SelectionArgs {
    /// Region to include (repeatable)
    #[arg(long = "region", value_name = "REGION")]
    regions: Vec<String>,

    /// Category to include (repeatable)
    #[arg(long = "category", value_name = "CATEGORY")]
    categories: Vec<String>,

    /// First date to include (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last date to include (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,
}

impl SelectionArgs {
    /// Overlays the given options on the select-everything default.
    fn resolve(self, table: &SalesTable) -> Option<SalesFilter> {
        let mut selection = SalesFilter::select_all(table)?;
        if !self.regions.is_empty() {
            selection.regions = self.regions.into_iter().collect();
        }
        if !self.categories.is_empty() {
            selection.categories = self.categories.into_iter().collect();
        }
        if let Some(start) = self.start {
            selection.start = start;
        }
        if let Some(end) = self.end {
            selection.end = end;
        }
        Some(selection)
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/sales_insights.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sales_insights.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let settings = Settings::from_env()?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Etl { input, output } => {
            let input = input.unwrap_or(settings.raw_path);
            let output = output.unwrap_or(settings.clean_path);
            let table = etl::run(&input, &output)
                .with_context(|| format!("ETL run failed for {}", input.display()))?;
            info!(rows = table.len(), output = %output.display(), "ETL complete");
        }
        Commands::Report {
            input,
            selection,
            top,
            json,
        } => {
            let table = load_table(input.as_deref().unwrap_or(settings.clean_path.as_path()))?;
            let Some(selection) = selection.resolve(&table) else {
                warn!("Cleaned table is empty, nothing to report");
                return Ok(());
            };

            let report = build_report(&table, &selection, top.unwrap_or(settings.top_n));
            print_pretty(&report);
            if json {
                print_json(&report)?;
            } else {
                print_report(&report);
            }
        }
        Commands::Export {
            input,
            selection,
            name,
            dir,
        } => {
            let table = load_table(input.as_deref().unwrap_or(settings.clean_path.as_path()))?;
            let filtered = match selection.resolve(&table) {
                Some(selection) => filter(&table, &selection),
                None => SalesTable::default(),
            };

            let export = export_csv(&filtered, &name)?;
            let path = export.save_to(&dir)?;
            info!(
                path = %path.display(),
                rows = filtered.len(),
                mime = export.mime,
                "Filtered data exported"
            );
        }
        Commands::Forecast {
            input,
            horizon,
            output,
        } => {
            let table = load_table(input.as_deref().unwrap_or(settings.clean_path.as_path()))?;
            let model = LinearTrend::new(settings.forecast_interval)?;
            let horizon = horizon.unwrap_or(settings.forecast_horizon_days);

            let points = forecast(&table, horizon, &model)
                .context("Cannot forecast without sales history")?;

            match output {
                Some(path) => {
                    write_forecast(&path, &points)?;
                    info!(path = %path.display(), horizon, "Forecast written");
                }
                None => print_json(&points)?,
            }
        }
    }

    Ok(())
}

/// Reads the cleaned table once for the lifetime of the command.
#[tracing::instrument(fields(path = %path.display()))]
fn load_table(path: &Path) -> Result<SalesTable> {
    let table = etl::load_clean_table(path)
        .with_context(|| format!("Failed to load cleaned data from {}", path.display()))?;
    info!(rows = table.len(), "Cleaned table loaded");
    Ok(table)
}
