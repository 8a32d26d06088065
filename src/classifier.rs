//! Business-rule classification of raw telemetry records.

use crate::record::{InvalidReason, RawRecord};

const MAX_SPEED_DEVIATION: f64 = 10.0;

/// Numeric view of a record whose seven measurement fields all parsed.
///
/// Carried inside [`Classification::Valid`] so the metrics step never
/// re-parses field text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericFields {
    pub latitude: f64,
    pub longitude: f64,
    pub power: f64,
    pub fuel_consumption: f64,
    pub actual_speed_overground: f64,
    pub proposed_speed_overground: f64,
    pub predicted_fuel_consumption: f64,
}

/// Outcome of classifying one raw record.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Valid(NumericFields),
    Invalid(Vec<InvalidReason>),
}

/// Applies the validation rules to a raw record.
///
/// A parse failure on any numeric field classifies the record invalid
/// with exactly `Number format exception`; no further rules run. On a
/// successful parse all three rules are evaluated independently and
/// every failure is accumulated, in checked order: latitude/longitude
/// bounds, negative magnitudes, speed outlier. Each rule contributes at
/// most one reason. Classification is a pure function of the record, so
/// classifying the same record twice yields identical reasons.
pub fn classify(record: &RawRecord) -> Classification {
    let Some(fields) = parse_numeric_fields(record) else {
        return Classification::Invalid(vec![InvalidReason::NumberFormat]);
    };

    let mut reasons = Vec::new();

    if fields.latitude < -90.0
        || fields.latitude > 90.0
        || fields.longitude < -180.0
        || fields.longitude > 180.0
    {
        reasons.push(InvalidReason::InvalidLatLon);
    }

    if fields.power < 0.0
        || fields.fuel_consumption < 0.0
        || fields.actual_speed_overground < 0.0
        || fields.proposed_speed_overground < 0.0
        || fields.predicted_fuel_consumption < 0.0
    {
        reasons.push(InvalidReason::NegativeValues);
    }

    if (fields.actual_speed_overground - fields.proposed_speed_overground).abs()
        > MAX_SPEED_DEVIATION
    {
        reasons.push(InvalidReason::Outliers);
    }

    if reasons.is_empty() {
        Classification::Valid(fields)
    } else {
        Classification::Invalid(reasons)
    }
}

fn parse_numeric_fields(record: &RawRecord) -> Option<NumericFields> {
    Some(NumericFields {
        latitude: record.latitude.parse().ok()?,
        longitude: record.longitude.parse().ok()?,
        power: record.power.parse().ok()?,
        fuel_consumption: record.fuel_consumption.parse().ok()?,
        actual_speed_overground: record.actual_speed_overground.parse().ok()?,
        proposed_speed_overground: record.proposed_speed_overground.parse().ok()?,
        predicted_fuel_consumption: record.predicted_fuel_consumption.parse().ok()?,
    })
}
