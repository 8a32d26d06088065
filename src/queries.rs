//! Read-side query operations over the record stores.
//!
//! Each operation maps an empty store lookup to [`DataError::NotFound`]
//! with a message identifying the query — distinct from operations that
//! legitimately return an empty collection after filtering.

use tracing::{debug, warn};

use crate::analyzers::compare::compare_compliance;
use crate::analyzers::grouping::{
    DEFAULT_INTERVAL_MINUTES, DEFAULT_SIZE_THRESHOLD, GroupingParams, identify_problem_groups,
};
use crate::analyzers::types::{ProblemGroup, SpeedDifference};
use crate::error::DataError;
use crate::record::{InvalidReason, ValidRecord};
use crate::store::{InvalidRecordStore, ReasonCount, ValidRecordStore};

/// Speed-difference rows for one vessel, optionally narrowed to an exact
/// coordinate pair.
pub async fn speed_differences(
    store: &dyn ValidRecordStore,
    vessel_code: &str,
    latitude: Option<&str>,
    longitude: Option<&str>,
) -> Result<Vec<SpeedDifference>, DataError> {
    debug!(vessel_code, ?latitude, ?longitude, "Calculating speed differences");

    let records = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => {
            store
                .find_by_vessel_and_position(vessel_code, latitude, longitude)
                .await?
        }
        _ => store.find_by_vessel_code(vessel_code).await?,
    };

    if records.is_empty() {
        warn!(vessel_code, "No data found for speed difference query");
        return Err(DataError::NotFound(
            "No data found for the given vessel code and coordinates.".to_string(),
        ));
    }

    debug!(count = records.len(), "Found valid vessel data entries");
    Ok(records
        .into_iter()
        .map(|record| SpeedDifference {
            latitude: record.latitude,
            longitude: record.longitude,
            speed_difference: record.speed_difference,
        })
        .collect())
}

/// Valid records for one vessel inside an inclusive datetime range.
pub async fn vessel_data_for_period(
    store: &dyn ValidRecordStore,
    vessel_code: &str,
    start_date: &str,
    end_date: &str,
) -> Result<Vec<ValidRecord>, DataError> {
    debug!(vessel_code, start_date, end_date, "Fetching vessel data for period");

    let records = store
        .find_by_vessel_and_range(vessel_code, start_date, end_date)
        .await?;

    if records.is_empty() {
        warn!(vessel_code, "No data found in the specified period");
        return Err(DataError::NotFound(format!(
            "No data found for vessel code: {vessel_code} in the specified period."
        )));
    }

    Ok(records)
}

/// Invalid-reason occurrence counts for one vessel, descending by count.
pub async fn invalid_reasons(
    store: &dyn InvalidRecordStore,
    vessel_code: &str,
) -> Result<Vec<ReasonCount>, DataError> {
    debug!(vessel_code, "Fetching invalid reasons");

    let rows = store.count_by_reason(vessel_code).await?;

    if rows.is_empty() {
        warn!(vessel_code, "No invalid data found");
        return Err(DataError::NotFound(format!(
            "No invalid data found for vessel code: {vessel_code}"
        )));
    }

    Ok(rows)
}

/// Store-aggregated average compliance for one vessel.
pub async fn overall_compliance(
    store: &dyn ValidRecordStore,
    vessel_code: &str,
) -> Result<f64, DataError> {
    debug!(vessel_code, "Calculating overall compliance");

    store
        .average_compliance(vessel_code)
        .await?
        .ok_or_else(|| {
            warn!(vessel_code, "No data found for compliance aggregate");
            DataError::NotFound(format!("No data found for vessel code: {vessel_code}"))
        })
}

/// Fetches both vessels' compliance aggregates and renders the verdict.
pub async fn compare_vessel_compliance(
    store: &dyn ValidRecordStore,
    vessel_code1: &str,
    vessel_code2: &str,
) -> Result<String, DataError> {
    let compliance1 = overall_compliance(store, vessel_code1).await?;
    let compliance2 = overall_compliance(store, vessel_code2).await?;

    debug!(
        vessel_code1,
        compliance1, vessel_code2, compliance2, "Comparing vessel compliance"
    );
    Ok(compare_compliance(
        vessel_code1,
        compliance1,
        vessel_code2,
        compliance2,
    ))
}

/// Ranked problem groups for one vessel's invalid history.
///
/// `invalid_reason` is either `"all"` or an exact reason code; an
/// unrecognized code matches nothing and reports not-found. Interval and
/// threshold overrides replace the compiled-in defaults for this call
/// only.
pub async fn problem_groups(
    store: &dyn InvalidRecordStore,
    vessel_code: &str,
    invalid_reason: &str,
    interval_minutes: Option<i64>,
    size_threshold: Option<usize>,
) -> Result<Vec<ProblemGroup>, DataError> {
    debug!(
        vessel_code,
        invalid_reason,
        ?interval_minutes,
        ?size_threshold,
        "Identifying problematic data"
    );

    let records = if invalid_reason == "all" {
        store.find_by_vessel_code(vessel_code).await?
    } else {
        match InvalidReason::parse(invalid_reason) {
            Some(reason) => store.find_by_vessel_and_reason(vessel_code, reason).await?,
            None => Vec::new(),
        }
    };

    if records.is_empty() {
        warn!(vessel_code, "No invalid data found for grouping");
        return Err(DataError::NotFound(format!(
            "No invalid data found for vessel code: {vessel_code}"
        )));
    }

    let params = GroupingParams {
        interval_minutes: interval_minutes.unwrap_or(DEFAULT_INTERVAL_MINUTES),
        size_threshold: size_threshold.unwrap_or(DEFAULT_SIZE_THRESHOLD),
    };
    identify_problem_groups(&records, params)
}
