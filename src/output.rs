//! Output formatting and persistence for classified records.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::record::{InvalidRecord, ValidRecord};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends classified-valid records as rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_valid_records(path: &str, records: &[ValidRecord]) -> Result<()> {
    append_rows(path, records)
}

/// Appends classified-invalid records as rows to a CSV file, with the
/// reason list serialized as its comma-joined string.
pub fn append_invalid_records(path: &str, records: &[InvalidRecord]) -> Result<()> {
    append_rows(path, records)
}

fn append_rows<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = rows.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{InvalidReason, RawRecord};
    use std::fs;

    fn valid_record() -> ValidRecord {
        ValidRecord {
            vessel_code: "3001".to_string(),
            datetime: "2023-10-06 01:06:00".to_string(),
            latitude: "44.8565368652344".to_string(),
            longitude: "-51.4986343383789".to_string(),
            power: "4947.18".to_string(),
            fuel_consumption: "16.6132".to_string(),
            actual_speed_overground: "8.95998".to_string(),
            proposed_speed_overground: "10.0698497759178".to_string(),
            predicted_fuel_consumption: "16.4471915433183".to_string(),
            speed_difference: -1.109869775917801,
            compliance_percentage: 88.97828864764128,
        }
    }

    fn invalid_record() -> InvalidRecord {
        InvalidRecord::new(
            RawRecord {
                vessel_code: "9701".to_string(),
                datetime: "2023-10-06 03:02:00".to_string(),
                latitude: "10.5".to_string(),
                longitude: "-14.7".to_string(),
                power: "-3000.0".to_string(),
                fuel_consumption: "12.0".to_string(),
                actual_speed_overground: "25.0".to_string(),
                proposed_speed_overground: "10.0".to_string(),
                predicted_fuel_consumption: "12.1".to_string(),
            },
            vec![InvalidReason::NegativeValues, InvalidReason::Outliers],
        )
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&valid_record());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&valid_record()).unwrap();
    }

    #[test]
    fn test_append_valid_records_creates_file_with_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("valid.csv");
        let path = path.to_str().unwrap();

        append_valid_records(path, &[valid_record()]).unwrap();
        append_valid_records(path, &[valid_record()]).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let header_count = content
            .lines()
            .filter(|l| l.contains("vessel_code"))
            .count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_append_invalid_records_serializes_joined_reasons() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.csv");
        let path = path.to_str().unwrap();

        append_invalid_records(path, &[invalid_record()]).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("invalid_reason"));
        assert!(content.contains("\"Negative values, Outliers\""));
    }
}
