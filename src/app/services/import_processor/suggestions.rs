//! Fix suggestions for a finished import

use super::processor::ImportResult;
use crate::app::models::FindingKind;
use crate::app::services::csv_parser::ParseError;
use crate::app::services::mapper::MappingErrorKind;
use crate::app::services::validator::suggest_corrections;
use crate::constants::HIGH_ERROR_RATE_PERCENT;

const EMPTY_FILE_HINT: &str =
    "The file has no data rows. Add a header row and at least one data row (see `mrv-import template`).";

const HIGH_ERROR_RATE_HINT: &str = "More than half of the rows were rejected. Compare the file with the import template (`mrv-import template`) and check the column mapping.";

const TIMESTAMP_FORMAT_HINT: &str =
    "Timestamps should look like 2025-07-28 09:00:00 or 2025/07/28 09:00 (ISO 8601 with Z is also accepted).";

/// Merge per-cell corrections with run-level hints, without duplicates
pub fn suggest_fixes(result: &ImportResult) -> Vec<String> {
    let mut fixes: Vec<String> = Vec::new();
    let mut push = |fix: String| {
        if !fixes.contains(&fix) {
            fixes.push(fix);
        }
    };

    let empty_file = matches!(result.parse_error, Some(ParseError::EmptyInput))
        || result
            .parse_result
            .as_ref()
            .is_some_and(|table| table.total_row_count == 0);
    if empty_file {
        push(EMPTY_FILE_HINT.to_string());
    }

    for problem in &result.mapping_problems {
        push(format!("Check the column mapping: {}", problem));
    }

    if let Some(validation) = &result.validation_result {
        for correction in suggest_corrections(&validation.errors) {
            push(format!(
                "Row {}, {}: change '{}' to '{}' ({})",
                correction.row,
                correction.column,
                correction.original,
                correction.suggested,
                correction.reason
            ));
        }
    }

    if result.summary.total_rows > 0 && result.summary.error_rate() > HIGH_ERROR_RATE_PERCENT {
        push(HIGH_ERROR_RATE_HINT.to_string());
    }

    let bad_timestamps = result.validation_result.as_ref().is_some_and(|validation| {
        validation
            .errors
            .iter()
            .any(|finding| finding.kind == FindingKind::InvalidDate)
    }) || result.mapping_result.as_ref().is_some_and(|mapping| {
        mapping.errors.iter().any(|error| {
            error.kind == MappingErrorKind::MissingTimestamp && !error.value.is_empty()
        })
    });
    if bad_timestamps {
        push(TIMESTAMP_FORMAT_HINT.to_string());
    }

    fixes
}
