//! Advisory fixes for common validation errors
//!
//! Suggestions are never applied automatically; they are surfaced next to
//! the findings they address.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::app::models::{FindingKind, ImportField, MeasurementField, ValidationFinding};
use crate::app::services::field_parsers::parse_number;
use crate::constants::ranges;

static NUMERIC_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+(?:\.\d+)?").expect("valid regex"));

static DATE_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})[/-](\d{1,2})[/-](\d{1,2})").expect("valid regex"));

/// Proposed replacement for one cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectionSuggestion {
    pub row: usize,
    pub column: String,
    pub original: String,
    pub suggested: String,
    pub reason: String,
}

/// Suggest fixes for the findings that have a mechanical correction
pub fn suggest_corrections(findings: &[ValidationFinding]) -> Vec<CorrectionSuggestion> {
    findings
        .iter()
        .filter(|finding| finding.is_error())
        .filter_map(|finding| {
            let (suggested, reason) = match finding.kind {
                FindingKind::InvalidNumber => (
                    numeric_part(&finding.value)?,
                    "Use only the numeric part of the value",
                ),
                FindingKind::InvalidDate => (
                    normalized_date(&finding.value)?,
                    "Use the YYYY-MM-DD HH:MM:SS format",
                ),
                FindingKind::OutOfRange
                    if finding.field == Some(ImportField::Value(MeasurementField::Ph)) =>
                {
                    (
                        rescaled_ph(&finding.value)?,
                        "pH may have been entered without a decimal point",
                    )
                }
                _ => return None,
            };

            Some(CorrectionSuggestion {
                row: finding.row,
                column: finding.column.clone(),
                original: finding.value.clone(),
                suggested,
                reason: reason.to_string(),
            })
        })
        .collect()
}

fn numeric_part(value: &str) -> Option<String> {
    NUMERIC_PART.find(value).map(|m| m.as_str().to_string())
}

fn normalized_date(value: &str) -> Option<String> {
    let captures = DATE_PART.captures(value)?;
    let month: u32 = captures[2].parse().ok()?;
    let day: u32 = captures[3].parse().ok()?;
    Some(format!("{}-{:02}-{:02} 00:00:00", &captures[1], month, day))
}

fn rescaled_ph(value: &str) -> Option<String> {
    let ph = parse_number(value)?;
    (ph > ranges::PH.1).then(|| (ph / 10.0).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::Severity;

    fn error(kind: FindingKind, field: Option<ImportField>, value: &str) -> ValidationFinding {
        ValidationFinding {
            row: 2,
            column: "col".to_string(),
            value: value.to_string(),
            message: String::new(),
            severity: Severity::Error,
            kind,
            field,
        }
    }

    #[test]
    fn test_numeric_part_extracted() {
        let findings = [error(FindingKind::InvalidNumber, None, "12.5 mg/L")];
        let suggestions = suggest_corrections(&findings);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].suggested, "12.5");
        assert_eq!(suggestions[0].original, "12.5 mg/L");
    }

    #[test]
    fn test_no_suggestion_without_digits() {
        let findings = [error(FindingKind::InvalidNumber, None, "n/a")];
        assert!(suggest_corrections(&findings).is_empty());
    }

    #[test]
    fn test_date_reformatted() {
        let findings = [
            error(FindingKind::InvalidDate, None, "2025/7/28 9時"),
            error(FindingKind::InvalidDate, None, "measured 2025-07-03"),
        ];
        let suggestions = suggest_corrections(&findings);

        assert_eq!(suggestions[0].suggested, "2025-07-28 00:00:00");
        assert_eq!(suggestions[1].suggested, "2025-07-03 00:00:00");
    }

    #[test]
    fn test_ph_rescaled() {
        let ph = Some(ImportField::Value(MeasurementField::Ph));
        let findings = [
            error(FindingKind::OutOfRange, ph, "72"),
            error(FindingKind::OutOfRange, ph, "-1"),
            error(
                FindingKind::OutOfRange,
                Some(ImportField::Value(MeasurementField::Iron)),
                "5000",
            ),
        ];
        let suggestions = suggest_corrections(&findings);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].suggested, "7.2");
    }

    #[test]
    fn test_warnings_ignored() {
        let mut finding = error(FindingKind::InvalidNumber, None, "12 mg");
        finding.severity = Severity::Warning;
        assert!(suggest_corrections(&[finding]).is_empty());
    }
}
