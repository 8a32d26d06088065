//! In-process record store used by the CLI and tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::DataError;
use crate::record::{InvalidRecord, InvalidReason, ValidRecord, parse_datetime};
use crate::store::{InvalidRecordStore, ReasonCount, ValidRecordStore};

/// Insertion-order-preserving store of both record kinds.
///
/// Batches append in the order they are saved, so retrieval order equals
/// source line order for a single ingestion run — the ordering contract
/// the grouping engine documents.
#[derive(Default)]
pub struct MemoryStore {
    valid: RwLock<Vec<ValidRecord>>,
    invalid: RwLock<Vec<InvalidRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clones out every stored valid record, in insertion order.
    pub async fn snapshot_valid(&self) -> Vec<ValidRecord> {
        self.valid.read().await.clone()
    }

    /// Clones out every stored invalid record, in insertion order.
    pub async fn snapshot_invalid(&self) -> Vec<InvalidRecord> {
        self.invalid.read().await.clone()
    }
}

#[async_trait]
impl ValidRecordStore for MemoryStore {
    async fn save_batch(&self, records: Vec<ValidRecord>) -> Result<(), DataError> {
        self.valid.write().await.extend(records);
        Ok(())
    }

    async fn find_by_vessel_code(&self, vessel_code: &str) -> Result<Vec<ValidRecord>, DataError> {
        let records = self.valid.read().await;
        Ok(records
            .iter()
            .filter(|r| r.vessel_code == vessel_code)
            .cloned()
            .collect())
    }

    async fn find_by_vessel_and_position(
        &self,
        vessel_code: &str,
        latitude: &str,
        longitude: &str,
    ) -> Result<Vec<ValidRecord>, DataError> {
        let records = self.valid.read().await;
        Ok(records
            .iter()
            .filter(|r| {
                r.vessel_code == vessel_code && r.latitude == latitude && r.longitude == longitude
            })
            .cloned()
            .collect())
    }

    async fn find_by_vessel_and_range(
        &self,
        vessel_code: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<ValidRecord>, DataError> {
        let start = parse_datetime(start)?;
        let end = parse_datetime(end)?;

        let records = self.valid.read().await;
        let mut matches = Vec::new();
        for record in records.iter().filter(|r| r.vessel_code == vessel_code) {
            let datetime = parse_datetime(&record.datetime)?;
            if datetime >= start && datetime <= end {
                matches.push(record.clone());
            }
        }
        Ok(matches)
    }

    async fn average_compliance(&self, vessel_code: &str) -> Result<Option<f64>, DataError> {
        let records = self.valid.read().await;
        let compliances: Vec<f64> = records
            .iter()
            .filter(|r| r.vessel_code == vessel_code)
            .map(|r| r.compliance_percentage)
            .collect();

        if compliances.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            compliances.iter().sum::<f64>() / compliances.len() as f64,
        ))
    }
}

#[async_trait]
impl InvalidRecordStore for MemoryStore {
    async fn save_batch(&self, records: Vec<InvalidRecord>) -> Result<(), DataError> {
        self.invalid.write().await.extend(records);
        Ok(())
    }

    async fn find_by_vessel_code(
        &self,
        vessel_code: &str,
    ) -> Result<Vec<InvalidRecord>, DataError> {
        let records = self.invalid.read().await;
        Ok(records
            .iter()
            .filter(|r| r.vessel_code == vessel_code)
            .cloned()
            .collect())
    }

    async fn find_by_vessel_and_reason(
        &self,
        vessel_code: &str,
        reason: InvalidReason,
    ) -> Result<Vec<InvalidRecord>, DataError> {
        let records = self.invalid.read().await;
        Ok(records
            .iter()
            .filter(|r| r.vessel_code == vessel_code && r.has_reason(reason))
            .cloned()
            .collect())
    }

    async fn count_by_reason(&self, vessel_code: &str) -> Result<Vec<ReasonCount>, DataError> {
        let records = self.invalid.read().await;

        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for record in records.iter().filter(|r| r.vessel_code == vessel_code) {
            *counts.entry(record.reason_string()).or_default() += 1;
        }

        let mut rows: Vec<ReasonCount> = counts
            .into_iter()
            .filter(|(reason, count)| !reason.is_empty() && *count > 0)
            .map(|(reason, count)| ReasonCount { reason, count })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawRecord;

    fn raw(vessel_code: &str, datetime: &str, latitude: &str, longitude: &str) -> RawRecord {
        RawRecord {
            vessel_code: vessel_code.to_string(),
            datetime: datetime.to_string(),
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            power: "4947.18".to_string(),
            fuel_consumption: "16.6132".to_string(),
            actual_speed_overground: "8.95998".to_string(),
            proposed_speed_overground: "10.0698497759178".to_string(),
            predicted_fuel_consumption: "16.4471915433183".to_string(),
        }
    }

    fn valid(vessel_code: &str, datetime: &str, compliance: f64) -> ValidRecord {
        let raw = raw(vessel_code, datetime, "44.85", "-51.49");
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
            speed_difference: -1.109869775917801,
            compliance_percentage: compliance,
        }
    }

    fn invalid(
        vessel_code: &str,
        datetime: &str,
        reasons: Vec<InvalidReason>,
    ) -> InvalidRecord {
        InvalidRecord::new(raw(vessel_code, datetime, "NULL", "NULL"), reasons)
    }

    #[tokio::test]
    async fn test_save_and_find_preserves_insertion_order() {
        let store = MemoryStore::new();
        ValidRecordStore::save_batch(
            &store,
            vec![
                valid("3001", "2023-10-06 01:06:00", 90.0),
                valid("3001", "2023-10-06 01:07:00", 80.0),
            ],
        )
        .await
        .unwrap();
        ValidRecordStore::save_batch(&store, vec![valid("3001", "2023-10-06 01:08:00", 70.0)])
            .await
            .unwrap();

        let records = ValidRecordStore::find_by_vessel_code(&store, "3001")
            .await
            .unwrap();
        let datetimes: Vec<&str> = records.iter().map(|r| r.datetime.as_str()).collect();
        assert_eq!(
            datetimes,
            vec![
                "2023-10-06 01:06:00",
                "2023-10-06 01:07:00",
                "2023-10-06 01:08:00",
            ]
        );
    }

    #[tokio::test]
    async fn test_find_by_position_is_exact_string_match() {
        let store = MemoryStore::new();
        ValidRecordStore::save_batch(&store, vec![valid("3001", "2023-10-06 01:06:00", 90.0)])
            .await
            .unwrap();

        let hits = store
            .find_by_vessel_and_position("3001", "44.85", "-51.49")
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        let misses = store
            .find_by_vessel_and_position("3001", "44.850", "-51.49")
            .await
            .unwrap();
        assert!(misses.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_range_is_inclusive() {
        let store = MemoryStore::new();
        ValidRecordStore::save_batch(
            &store,
            vec![
                valid("3001", "2023-10-06 01:06:00", 90.0),
                valid("3001", "2023-10-06 01:07:00", 90.0),
                valid("3001", "2023-10-06 01:08:00", 90.0),
            ],
        )
        .await
        .unwrap();

        let hits = store
            .find_by_vessel_and_range("3001", "2023-10-06 01:06:00", "2023-10-06 01:07:00")
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_range_rejects_bad_bound() {
        let store = MemoryStore::new();
        let result = store
            .find_by_vessel_and_range("3001", "06/10/2023", "2023-10-06 01:07:00")
            .await;
        assert!(matches!(result, Err(DataError::Timestamp { .. })));
    }

    #[tokio::test]
    async fn test_average_compliance() {
        let store = MemoryStore::new();
        ValidRecordStore::save_batch(
            &store,
            vec![
                valid("3001", "2023-10-06 01:06:00", 90.0),
                valid("3001", "2023-10-06 01:07:00", 100.0),
                valid("9701", "2023-10-06 01:08:00", 10.0),
            ],
        )
        .await
        .unwrap();

        assert_eq!(store.average_compliance("3001").await.unwrap(), Some(95.0));
        assert_eq!(store.average_compliance("9701").await.unwrap(), Some(10.0));
        assert_eq!(store.average_compliance("4004").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_find_by_reason_matches_membership() {
        let store = MemoryStore::new();
        InvalidRecordStore::save_batch(
            &store,
            vec![
                invalid(
                    "9701",
                    "2023-10-06 03:01:00",
                    vec![InvalidReason::InvalidLatLon, InvalidReason::NegativeValues],
                ),
                invalid("9701", "2023-10-06 03:02:00", vec![InvalidReason::Outliers]),
            ],
        )
        .await
        .unwrap();

        let hits = store
            .find_by_vessel_and_reason("9701", InvalidReason::NegativeValues)
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].datetime, "2023-10-06 03:01:00");
    }

    #[tokio::test]
    async fn test_count_by_reason_groups_and_sorts_descending() {
        let store = MemoryStore::new();
        InvalidRecordStore::save_batch(
            &store,
            vec![
                invalid("19310", "2023-10-06 02:00:00", vec![InvalidReason::NumberFormat]),
                invalid("19310", "2023-10-06 02:10:00", vec![InvalidReason::NumberFormat]),
                invalid("19310", "2023-10-06 02:20:00", vec![InvalidReason::Outliers]),
            ],
        )
        .await
        .unwrap();

        let rows = store.count_by_reason("19310").await.unwrap();
        assert_eq!(
            rows,
            vec![
                ReasonCount {
                    reason: "Number format exception".to_string(),
                    count: 2,
                },
                ReasonCount {
                    reason: "Outliers".to_string(),
                    count: 1,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_count_by_reason_groups_joined_strings() {
        let store = MemoryStore::new();
        InvalidRecordStore::save_batch(
            &store,
            vec![
                invalid(
                    "9701",
                    "2023-10-06 03:01:00",
                    vec![InvalidReason::NegativeValues, InvalidReason::Outliers],
                ),
                invalid(
                    "9701",
                    "2023-10-06 03:02:00",
                    vec![InvalidReason::NegativeValues, InvalidReason::Outliers],
                ),
            ],
        )
        .await
        .unwrap();

        let rows = store.count_by_reason("9701").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].reason, "Negative values, Outliers");
        assert_eq!(rows[0].count, 2);
    }
}
