//! Consecutive-group detection over invalid-record history.

use chrono::{Duration, NaiveDateTime};
use tracing::debug;

use crate::analyzers::types::ProblemGroup;
use crate::error::DataError;
use crate::record::{InvalidRecord, parse_datetime};

/// Default maximum gap, in minutes, between two consecutive invalid
/// records for them to belong to the same problem group.
pub const DEFAULT_INTERVAL_MINUTES: i64 = 60;

/// Default group-size filter. Groups must be strictly larger than this
/// to be reported.
pub const DEFAULT_SIZE_THRESHOLD: usize = 10;

/// Per-call grouping parameters.
///
/// Always passed explicitly: concurrent callers with different overrides
/// must not race on shared state, so the only process-wide values are
/// the immutable compiled-in defaults.
#[derive(Debug, Clone, Copy)]
pub struct GroupingParams {
    pub interval_minutes: i64,
    pub size_threshold: usize,
}

impl Default for GroupingParams {
    fn default() -> Self {
        GroupingParams {
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            size_threshold: DEFAULT_SIZE_THRESHOLD,
        }
    }
}

/// Clusters a vessel's invalid records into problem groups, filters them
/// by size, and ranks them.
///
/// Records are walked in the order supplied, which is the store's
/// retrieval order (insertion order, equal to source line order for a
/// single run). A record whose timestamp is strictly before the previous
/// record's timestamp plus the interval extends the current group;
/// otherwise it opens a new one. Surviving groups are those strictly
/// larger than `size_threshold`, sorted by size descending; equal sizes
/// keep their encounter order.
///
/// # Errors
///
/// Empty input returns [`DataError::NotFound`] — no records to group is
/// reported, never silently returned as an empty list. A populated input
/// whose groups are all filtered out returns `Ok` with an empty vec. An
/// unparseable timestamp returns [`DataError::Timestamp`].
pub fn identify_problem_groups(
    records: &[InvalidRecord],
    params: GroupingParams,
) -> Result<Vec<ProblemGroup>, DataError> {
    if records.is_empty() {
        return Err(DataError::NotFound(
            "No invalid data available for grouping.".to_string(),
        ));
    }

    let groups = group_consecutive(records, params.interval_minutes)?;
    debug!(group_count = groups.len(), "Identified consecutive groups");

    let mut results: Vec<ProblemGroup> = groups
        .into_iter()
        .filter(|group| group.len() > params.size_threshold)
        .map(|group| ProblemGroup {
            size: group.len(),
            start_datetime: group[0].datetime.clone(),
            end_datetime: group[group.len() - 1].datetime.clone(),
        })
        .collect();

    // Stable sort: equal sizes keep their encounter order.
    results.sort_by(|a, b| b.size.cmp(&a.size));

    debug!(result_count = results.len(), "Ranked problem groups");
    Ok(results)
}

/// Single pass splitting `records` wherever the gap to the previous
/// record reaches the interval.
fn group_consecutive<'a>(
    records: &'a [InvalidRecord],
    interval_minutes: i64,
) -> Result<Vec<Vec<&'a InvalidRecord>>, DataError> {
    let mut groups: Vec<Vec<&InvalidRecord>> = Vec::new();
    let mut last: Option<NaiveDateTime> = None;

    for record in records {
        let current = parse_datetime(&record.datetime)?;
        match (last, groups.last_mut()) {
            (Some(previous), Some(group))
                if current < previous + Duration::minutes(interval_minutes) =>
            {
                group.push(record);
            }
            _ => groups.push(vec![record]),
        }
        last = Some(current);
    }

    Ok(groups)
}
