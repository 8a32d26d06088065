//! Textual compliance comparison between two vessels.

use std::cmp::Ordering;

/// Renders the verdict for two externally supplied aggregate compliance
/// percentages. The strictly higher percentage wins; equal percentages
/// produce a tie message.
pub fn compare_compliance(
    vessel_code1: &str,
    compliance1: f64,
    vessel_code2: &str,
    compliance2: f64,
) -> String {
    match compliance1
        .partial_cmp(&compliance2)
        .unwrap_or(Ordering::Equal)
    {
        Ordering::Greater => format!(
            "Vessel {vessel_code1} is more compliant with a compliance percentage of {compliance1}."
        ),
        Ordering::Less => format!(
            "Vessel {vessel_code2} is more compliant with a compliance percentage of {compliance2}."
        ),
        Ordering::Equal => {
            format!("Both vessels have the same compliance percentage of {compliance1}.")
        }
    }
}
