//! Telemetry record types shared across the pipeline.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use crate::error::DataError;

/// Timestamp format used throughout the telemetry source,
/// e.g. `2023-10-06 01:06:00`. No timezone is modeled.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a telemetry timestamp in [`DATE_TIME_FORMAT`].
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, DataError> {
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT).map_err(|source| {
        DataError::Timestamp {
            value: value.to_string(),
            source,
        }
    })
}

/// One telemetry observation exactly as split from an input line.
///
/// All nine fields stay text at this stage; type coercion happens in the
/// classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub vessel_code: String,
    pub datetime: String,
    pub latitude: String,
    pub longitude: String,
    pub power: String,
    pub fuel_consumption: String,
    pub actual_speed_overground: String,
    pub proposed_speed_overground: String,
    pub predicted_fuel_consumption: String,
}

/// Why a record was classified invalid.
///
/// `NumberFormat` is exclusive to failed numeric parses and suppresses the
/// other rules; the remaining variants may co-occur on one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InvalidReason {
    #[serde(rename = "Invalid latitude or longitude")]
    InvalidLatLon,
    #[serde(rename = "Negative values")]
    NegativeValues,
    #[serde(rename = "Outliers")]
    Outliers,
    #[serde(rename = "Number format exception")]
    NumberFormat,
}

impl InvalidReason {
    /// Resolves a reason code from its display string, as used by the
    /// reason-filtered queries. Unknown strings resolve to `None`.
    pub fn parse(value: &str) -> Option<InvalidReason> {
        match value {
            "Invalid latitude or longitude" => Some(InvalidReason::InvalidLatLon),
            "Negative values" => Some(InvalidReason::NegativeValues),
            "Outliers" => Some(InvalidReason::Outliers),
            "Number format exception" => Some(InvalidReason::NumberFormat),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidReason::InvalidLatLon => "Invalid latitude or longitude",
            InvalidReason::NegativeValues => "Negative values",
            InvalidReason::Outliers => "Outliers",
            InvalidReason::NumberFormat => "Number format exception",
        }
    }
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified-valid observation enriched with derived metrics.
#[derive(Debug, Clone, Serialize)]
pub struct ValidRecord {
    pub vessel_code: String,
    pub datetime: String,
    pub latitude: String,
    pub longitude: String,
    pub power: String,
    pub fuel_consumption: String,
    pub actual_speed_overground: String,
    pub proposed_speed_overground: String,
    pub predicted_fuel_consumption: String,
    pub speed_difference: f64,
    pub compliance_percentage: f64,
}

/// A classified-invalid observation with its ordered reason list.
#[derive(Debug, Clone, Serialize)]
pub struct InvalidRecord {
    pub vessel_code: String,
    pub datetime: String,
    pub latitude: String,
    pub longitude: String,
    pub power: String,
    pub fuel_consumption: String,
    pub actual_speed_overground: String,
    pub proposed_speed_overground: String,
    pub predicted_fuel_consumption: String,
    #[serde(rename = "invalid_reason", serialize_with = "serialize_reasons")]
    pub reasons: Vec<InvalidReason>,
}

impl InvalidRecord {
    pub fn new(raw: RawRecord, reasons: Vec<InvalidReason>) -> Self {
        InvalidRecord {
            vessel_code: raw.vessel_code,
            datetime: raw.datetime,
            latitude: raw.latitude,
            longitude: raw.longitude,
            power: raw.power,
            fuel_consumption: raw.fuel_consumption,
            actual_speed_overground: raw.actual_speed_overground,
            proposed_speed_overground: raw.proposed_speed_overground,
            predicted_fuel_consumption: raw.predicted_fuel_consumption,
            reasons,
        }
    }

    /// Comma-joined reason codes, the serialized form used for export and
    /// the count-by-reason query.
    pub fn reason_string(&self) -> String {
        self.reasons
            .iter()
            .map(InvalidReason::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn has_reason(&self, reason: InvalidReason) -> bool {
        self.reasons.contains(&reason)
    }
}

fn serialize_reasons<S: Serializer>(
    reasons: &[InvalidReason],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let joined = reasons
        .iter()
        .map(InvalidReason::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    serializer.serialize_str(&joined)
}
