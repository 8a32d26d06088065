//! Record store seam between the pipeline and persistence.
//!
//! The pipeline flushes batches through these traits and the read-side
//! queries retrieve through them; what sits behind them (a database, a
//! file, [`MemoryStore`]) is a collaborator concern. Store queries return
//! plain collections — the "no data found" policy belongs to the query
//! layer, not the store.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::DataError;
use crate::record::{InvalidRecord, InvalidReason, ValidRecord};

/// One row of the grouped count-by-reason query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonCount {
    pub reason: String,
    pub count: u64,
}

/// Append-only store of classified-valid records.
///
/// Implementations must preserve insertion order in retrieval: the
/// grouping engine downstream relies on retrieval order matching the
/// order batches were saved in.
#[async_trait]
pub trait ValidRecordStore: Send + Sync {
    /// Persists one flushed batch. Records within the batch keep their
    /// order. A failure here is terminal for the ingestion run.
    async fn save_batch(&self, records: Vec<ValidRecord>) -> Result<(), DataError>;

    async fn find_by_vessel_code(&self, vessel_code: &str) -> Result<Vec<ValidRecord>, DataError>;

    /// Exact string match on the latitude and longitude fields.
    async fn find_by_vessel_and_position(
        &self,
        vessel_code: &str,
        latitude: &str,
        longitude: &str,
    ) -> Result<Vec<ValidRecord>, DataError>;

    /// Records whose datetime falls inside `[start, end]`, both in the
    /// fixed `yyyy-MM-dd HH:mm:ss` format.
    async fn find_by_vessel_and_range(
        &self,
        vessel_code: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<ValidRecord>, DataError>;

    /// Average compliance percentage over all records of one vessel, or
    /// `None` when the vessel has no records.
    async fn average_compliance(&self, vessel_code: &str) -> Result<Option<f64>, DataError>;
}

/// Append-only store of classified-invalid records.
///
/// The same insertion-order retrieval contract as [`ValidRecordStore`]
/// applies.
#[async_trait]
pub trait InvalidRecordStore: Send + Sync {
    async fn save_batch(&self, records: Vec<InvalidRecord>) -> Result<(), DataError>;

    async fn find_by_vessel_code(
        &self,
        vessel_code: &str,
    ) -> Result<Vec<InvalidRecord>, DataError>;

    /// Records whose reason set contains `reason`. Membership rather
    /// than whole-string equality, so a multi-reason record is found
    /// when filtering on any one of its defect classes.
    async fn find_by_vessel_and_reason(
        &self,
        vessel_code: &str,
        reason: InvalidReason,
    ) -> Result<Vec<InvalidRecord>, DataError>;

    /// Occurrence counts grouped on the serialized reason string,
    /// descending by count. Empty reasons and non-positive counts are
    /// excluded.
    async fn count_by_reason(&self, vessel_code: &str) -> Result<Vec<ReasonCount>, DataError>;
}
