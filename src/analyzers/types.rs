//! Output types produced by the read-side analyzers.

use serde::Serialize;

/// A maximal run of temporally-contiguous invalid observations.
///
/// Derived output only, never persisted. The endpoints are the first and
/// last member's timestamps in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemGroup {
    pub size: usize,
    pub start_datetime: String,
    pub end_datetime: String,
}

/// One row of the speed-difference query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedDifference {
    pub latitude: String,
    pub longitude: String,
    pub speed_difference: f64,
}
