use std::io;

use thiserror::Error;

/// Error type for ingestion, storage, and read-side query failures.
///
/// Parsing and classification anomalies are data outcomes, not errors:
/// a malformed line is dropped and a non-numeric field becomes an
/// invalidity reason. Only I/O faults, store faults, and "no data"
/// conditions surface here.
#[derive(Debug, Error)]
pub enum DataError {
    /// A read-side query matched nothing. The message identifies the
    /// query that came back empty. Distinct from a populated query
    /// whose results were all filtered out, which is a normal empty
    /// result.
    #[error("{0}")]
    NotFound(String),
    /// A stored timestamp did not match the `yyyy-MM-dd HH:mm:ss`
    /// format expected by grouping and range logic.
    #[error("unparseable timestamp '{value}': {source}")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },
    /// A batch flush to a record store failed. Batches flushed before
    /// the failure stay committed.
    #[error("record store failure: {0}")]
    Store(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}
