//! CLI entry point for the vessel compliance tool.
//!
//! Provides subcommands for ingesting a telemetry CSV and running the
//! read-side queries (speed differences, invalid reasons, problem
//! groups, compliance comparison) against the ingested data.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use vessel_compliance::{
    output::{append_invalid_records, append_valid_records, print_json},
    pipeline::{DEFAULT_BATCH_SIZE, IngestConfig, ingest_file},
    queries,
    store::MemoryStore,
};

#[derive(Parser)]
#[command(name = "vessel_compliance")]
#[command(about = "A tool to classify vessel telemetry and detect data-quality incidents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a telemetry CSV, classify every record, and optionally
    /// export the classified records
    Ingest {
        /// Path to the telemetry CSV file
        #[arg(value_name = "FILE")]
        source: String,

        /// Records per batch flush
        #[arg(short, long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Treat the first line as data instead of a header row
        #[arg(long, default_value_t = false)]
        no_header: bool,

        /// CSV file to append classified-valid records to
        #[arg(long)]
        valid_output: Option<String>,

        /// CSV file to append classified-invalid records to
        #[arg(long)]
        invalid_output: Option<String>,
    },
    /// Detect ranked problem groups in a vessel's invalid records
    ProblemGroups {
        /// Path to the telemetry CSV file
        #[arg(value_name = "FILE")]
        source: String,

        /// Vessel code to analyze
        #[arg(short, long)]
        vessel_code: String,

        /// Reason code to filter on, or "all"
        #[arg(short, long, default_value = "all")]
        reason: String,

        /// Override the grouping interval in minutes
        #[arg(short, long)]
        interval: Option<i64>,

        /// Override the minimum group size threshold
        #[arg(short = 't', long)]
        threshold: Option<usize>,
    },
    /// Count invalid-record reasons for a vessel
    InvalidReasons {
        /// Path to the telemetry CSV file
        #[arg(value_name = "FILE")]
        source: String,

        /// Vessel code to analyze
        #[arg(short, long)]
        vessel_code: String,
    },
    /// List speed differences for a vessel, optionally at one coordinate
    SpeedDifference {
        /// Path to the telemetry CSV file
        #[arg(value_name = "FILE")]
        source: String,

        /// Vessel code to analyze
        #[arg(short, long)]
        vessel_code: String,

        /// Exact latitude to match
        #[arg(long)]
        latitude: Option<String>,

        /// Exact longitude to match
        #[arg(long)]
        longitude: Option<String>,
    },
    /// Compare the overall compliance of two vessels
    CompareCompliance {
        /// Path to the telemetry CSV file
        #[arg(value_name = "FILE")]
        source: String,

        /// First vessel code
        vessel_code1: String,

        /// Second vessel code
        vessel_code2: String,
    },
    /// List a vessel's valid records inside a datetime range
    VesselData {
        /// Path to the telemetry CSV file
        #[arg(value_name = "FILE")]
        source: String,

        /// Vessel code to analyze
        #[arg(short, long)]
        vessel_code: String,

        /// Range start, yyyy-MM-dd HH:mm:ss
        #[arg(long)]
        start_date: String,

        /// Range end, yyyy-MM-dd HH:mm:ss
        #[arg(long)]
        end_date: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/vessel_compliance.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("vessel_compliance.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            source,
            batch_size,
            no_header,
            valid_output,
            invalid_output,
        } => {
            let store = MemoryStore::new();
            let config = IngestConfig {
                batch_size,
                has_header: !no_header,
            };
            let report = ingest_file(&source, &store, &store, &config).await?;

            info!(
                valid = report.valid_count,
                invalid = report.invalid_count,
                dropped = report.dropped_count,
                "Source classified"
            );

            if let Some(path) = valid_output {
                let records = store.snapshot_valid().await;
                append_valid_records(&path, &records)?;
                info!(path = %path, count = records.len(), "Valid records exported");
            }
            if let Some(path) = invalid_output {
                let records = store.snapshot_invalid().await;
                append_invalid_records(&path, &records)?;
                info!(path = %path, count = records.len(), "Invalid records exported");
            }
        }
        Commands::ProblemGroups {
            source,
            vessel_code,
            reason,
            interval,
            threshold,
        } => {
            let store = ingest_into_memory(&source).await?;
            let groups =
                queries::problem_groups(&store, &vessel_code, &reason, interval, threshold).await?;

            info!(vessel_code = %vessel_code, group_count = groups.len(), "Problem groups identified");
            print_json(&groups)?;
        }
        Commands::InvalidReasons {
            source,
            vessel_code,
        } => {
            let store = ingest_into_memory(&source).await?;
            let rows = queries::invalid_reasons(&store, &vessel_code).await?;

            print_json(&rows)?;
        }
        Commands::SpeedDifference {
            source,
            vessel_code,
            latitude,
            longitude,
        } => {
            let store = ingest_into_memory(&source).await?;
            let rows = queries::speed_differences(
                &store,
                &vessel_code,
                latitude.as_deref(),
                longitude.as_deref(),
            )
            .await?;

            print_json(&rows)?;
        }
        Commands::CompareCompliance {
            source,
            vessel_code1,
            vessel_code2,
        } => {
            let store = ingest_into_memory(&source).await?;
            let verdict =
                queries::compare_vessel_compliance(&store, &vessel_code1, &vessel_code2).await?;

            info!("{verdict}");
        }
        Commands::VesselData {
            source,
            vessel_code,
            start_date,
            end_date,
        } => {
            let store = ingest_into_memory(&source).await?;
            let records =
                queries::vessel_data_for_period(&store, &vessel_code, &start_date, &end_date)
                    .await?;

            print_json(&records)?;
        }
    }

    Ok(())
}

/// Ingests the source into a fresh in-memory store for a read-side
/// subcommand.
async fn ingest_into_memory(source: &str) -> Result<MemoryStore> {
    let store = MemoryStore::new();
    let report = ingest_file(source, &store, &store, &IngestConfig::default()).await?;
    info!(
        valid = report.valid_count,
        invalid = report.invalid_count,
        dropped = report.dropped_count,
        "Source classified"
    );
    Ok(store)
}
