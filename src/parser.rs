//! Line parser for the delimited telemetry source.

use tracing::warn;

use crate::record::RawRecord;

const FIELD_DELIMITER: char = ',';
const FIELD_COUNT: usize = 9;

/// Splits one input line into a [`RawRecord`].
///
/// Quote characters are stripped before splitting. A line that does not
/// produce exactly nine fields is dropped: it is logged as a warning and
/// yields `None` rather than surfacing as invalid data. Fields are
/// assigned positionally and stay untrimmed text.
pub fn parse_line(line: &str) -> Option<RawRecord> {
    let stripped = line.replace('"', "");
    let fields: Vec<&str> = stripped.split(FIELD_DELIMITER).collect();

    if fields.len() != FIELD_COUNT {
        warn!(
            field_count = fields.len(),
            "Dropping malformed line, expected {} fields", FIELD_COUNT
        );
        return None;
    }

    Some(RawRecord {
        vessel_code: fields[0].to_string(),
        datetime: fields[1].to_string(),
        latitude: fields[2].to_string(),
        longitude: fields[3].to_string(),
        power: fields[4].to_string(),
        fuel_consumption: fields[5].to_string(),
        actual_speed_overground: fields[6].to_string(),
        proposed_speed_overground: fields[7].to_string(),
        predicted_fuel_consumption: fields[8].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_line() {
        let line = "\"3001\",\"2023-06-01 00:00:00\",\"10.2894458770752\",\"-14.788875579834\",\"0\",\"0\",\"0.039996\",\"-0.189904262498021\",\"0\"";
        let record = parse_line(line).unwrap();

        assert_eq!(record.vessel_code, "3001");
        assert_eq!(record.datetime, "2023-06-01 00:00:00");
        assert_eq!(record.latitude, "10.2894458770752");
        assert_eq!(record.longitude, "-14.788875579834");
        assert_eq!(record.power, "0");
        assert_eq!(record.fuel_consumption, "0");
        assert_eq!(record.actual_speed_overground, "0.039996");
        assert_eq!(record.proposed_speed_overground, "-0.189904262498021");
        assert_eq!(record.predicted_fuel_consumption, "0");
    }

    #[test]
    fn test_parse_line_preserves_null_text() {
        // NULL sensor fields are still text at this stage; classification
        // decides what to do with them.
        let line = "19310,2023-06-01 00:07:00,NULL,NULL,NULL,NULL,NULL,NULL,0";
        let record = parse_line(line).unwrap();

        assert_eq!(record.vessel_code, "19310");
        assert_eq!(record.latitude, "NULL");
        assert_eq!(record.predicted_fuel_consumption, "0");
    }

    #[test]
    fn test_parse_line_too_few_fields() {
        assert!(parse_line("3001,2023-06-01 00:00:00,10.28").is_none());
    }

    #[test]
    fn test_parse_line_too_many_fields() {
        let line = "3001,2023-06-01 00:00:00,1,2,3,4,5,6,7,8";
        assert!(parse_line(line).is_none());
    }

    #[test]
    fn test_parse_empty_line_is_dropped() {
        assert!(parse_line("").is_none());
    }

    #[test]
    fn test_parse_line_does_not_trim() {
        let line = "3001, 2023-06-01 00:00:00,1,2,3,4,5,6,7";
        let record = parse_line(line).unwrap();
        assert_eq!(record.datetime, " 2023-06-01 00:00:00");
    }
}
