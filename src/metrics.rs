//! Derived compliance metrics for validated records.

use crate::classifier::NumericFields;
use crate::record::{RawRecord, ValidRecord};

/// Signed difference between actual and proposed speed overground.
pub fn speed_difference(actual: f64, proposed: f64) -> f64 {
    actual - proposed
}

/// How closely actual speed tracked proposed speed, as a 0-100 score.
///
/// A proposed speed of zero yields 0 (division guard, not an error).
/// Otherwise `100 - (|speed_difference| / proposed) * 100`, floored at
/// zero: the score is legitimately 0 whenever the deviation exceeds the
/// proposed speed itself, and exactly 100 only when the difference is 0.
pub fn compliance_percentage(speed_difference: f64, proposed: f64) -> f64 {
    if proposed == 0.0 {
        return 0.0;
    }
    let compliance = 100.0 - (speed_difference.abs() / proposed) * 100.0;
    compliance.max(0.0)
}

/// Builds the enriched valid record from a raw record whose numeric
/// fields already parsed during classification.
pub fn enrich(raw: RawRecord, fields: &NumericFields) -> ValidRecord {
    let difference = speed_difference(
        fields.actual_speed_overground,
        fields.proposed_speed_overground,
    );
    let compliance = compliance_percentage(difference, fields.proposed_speed_overground);

    ValidRecord {
        vessel_code: raw.vessel_code,
        datetime: raw.datetime,
        latitude: raw.latitude,
        longitude: raw.longitude,
        power: raw.power,
        fuel_consumption: raw.fuel_consumption,
        actual_speed_overground: raw.actual_speed_overground,
        proposed_speed_overground: raw.proposed_speed_overground,
        predicted_fuel_consumption: raw.predicted_fuel_consumption,
        speed_difference: difference,
        compliance_percentage: compliance,
    }
}
