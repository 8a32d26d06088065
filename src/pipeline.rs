//! Batch ingestion pipeline: one linear pass from source lines to
//! flushed record batches.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::classifier::{Classification, classify};
use crate::error::DataError;
use crate::metrics::enrich;
use crate::parser::parse_line;
use crate::record::InvalidRecord;
use crate::store::{InvalidRecordStore, ValidRecordStore};

/// Default number of records buffered per flush. Small enough that test
/// overrides in the single digits still behave identically, large enough
/// to bound store round-trips on multi-million-line sources.
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Per-run ingestion settings.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Buffer size at which each record buffer flushes to its store. The
    /// valid and invalid buffers flush independently.
    pub batch_size: usize,
    /// Skip the first line of the source (the telemetry export carries a
    /// column-header row).
    pub has_header: bool,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            batch_size: DEFAULT_BATCH_SIZE,
            has_header: true,
        }
    }
}

/// Counters accumulated over one ingestion run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub valid_count: u64,
    pub invalid_count: u64,
    pub dropped_count: u64,
}

/// Opens `path` and ingests it line by line.
///
/// # Errors
///
/// Returns an error if the source cannot be opened or read, or if a
/// batch flush fails. Either aborts the run; batches flushed before the
/// failure stay committed.
pub async fn ingest_file(
    path: impl AsRef<Path>,
    valid_store: &dyn ValidRecordStore,
    invalid_store: &dyn InvalidRecordStore,
    config: &IngestConfig,
) -> Result<IngestReport, DataError> {
    let path = path.as_ref();
    info!(path = %path.display(), "Reading telemetry source");
    let file = File::open(path)?;
    ingest_reader(BufReader::new(file), valid_store, invalid_store, config).await
}

/// Drives the parser, classifier, and metrics calculator over every line
/// of `reader`, flushing valid and invalid batches to their stores.
///
/// Lines with a malformed field count are dropped (counted, warned about
/// by the parser, and otherwise ignored). Within each store, record
/// order matches source line order: batches flush in the order they
/// fill and each batch preserves insertion order.
pub async fn ingest_reader<R: BufRead>(
    reader: R,
    valid_store: &dyn ValidRecordStore,
    invalid_store: &dyn InvalidRecordStore,
    config: &IngestConfig,
) -> Result<IngestReport, DataError> {
    let mut report = IngestReport::default();
    let mut valid_buffer = Vec::new();
    let mut invalid_buffer = Vec::new();

    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        if config.has_header && line_number == 0 {
            continue;
        }

        let Some(raw) = parse_line(&line) else {
            report.dropped_count += 1;
            continue;
        };

        match classify(&raw) {
            Classification::Valid(fields) => {
                valid_buffer.push(enrich(raw, &fields));
                report.valid_count += 1;
                if valid_buffer.len() >= config.batch_size {
                    flush_valid(valid_store, &mut valid_buffer).await?;
                }
            }
            Classification::Invalid(reasons) => {
                invalid_buffer.push(InvalidRecord::new(raw, reasons));
                report.invalid_count += 1;
                if invalid_buffer.len() >= config.batch_size {
                    flush_invalid(invalid_store, &mut invalid_buffer).await?;
                }
            }
        }
    }

    // Final partial flushes after the source is exhausted.
    if !valid_buffer.is_empty() {
        flush_valid(valid_store, &mut valid_buffer).await?;
    }
    if !invalid_buffer.is_empty() {
        flush_invalid(invalid_store, &mut invalid_buffer).await?;
    }

    info!(
        valid = report.valid_count,
        invalid = report.invalid_count,
        dropped = report.dropped_count,
        "Ingestion run complete"
    );
    Ok(report)
}

async fn flush_valid(
    store: &dyn ValidRecordStore,
    buffer: &mut Vec<crate::record::ValidRecord>,
) -> Result<(), DataError> {
    debug!(batch_size = buffer.len(), "Flushing valid record batch");
    store.save_batch(std::mem::take(buffer)).await
}

async fn flush_invalid(
    store: &dyn InvalidRecordStore,
    buffer: &mut Vec<InvalidRecord>,
) -> Result<(), DataError> {
    debug!(batch_size = buffer.len(), "Flushing invalid record batch");
    store.save_batch(std::mem::take(buffer)).await
}
