//! Invalid-record clustering and compliance comparison.
//!
//! This module turns a vessel's invalid-record history into ranked
//! problem groups (maximal runs of temporally-contiguous anomalies) and
//! renders compliance comparisons between vessels.

pub mod compare;
pub mod grouping;
pub mod types;
