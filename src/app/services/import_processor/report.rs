//! Plain-text import report

use super::processor::ImportResult;
use crate::constants::REPORT_FINDINGS_PER_STAGE;

/// Render counts per stage plus the first few errors of each stage
pub fn render_report(result: &ImportResult) -> String {
    let summary = &result.summary;
    let mut lines = vec![
        "CSV Import Report".to_string(),
        "=================".to_string(),
        format!("Status: {}", if result.success { "SUCCESS" } else { "FAILED" }),
        format!("Processing time: {} ms", result.processing_time.as_millis()),
        String::new(),
        "Parsing".to_string(),
    ];

    match &summary.parsing.error {
        Some(error) => lines.push(format!("  Error: {}", error)),
        None => {
            lines.push(format!("  Total rows: {}", summary.parsing.total_rows));
            lines.push(format!("  Parsed rows: {}", summary.parsing.parsed_rows));
            lines.push(format!("  Malformed rows: {}", summary.parsing.malformed_rows));
        }
    }
    if let Some(table) = &result.parse_result {
        push_items(
            &mut lines,
            table
                .row_errors
                .iter()
                .map(|e| format!("Row {}: {}", e.row_number, e.message)),
        );
    }

    if let Some(mapping) = &result.column_mapping {
        lines.push(String::new());
        lines.push("Column mapping".to_string());
        for (field, header) in mapping.iter() {
            lines.push(format!("  {} <- \"{}\"", field, header));
        }
        push_items(&mut lines, result.mapping_problems.iter().cloned());
    }

    if let Some(validation) = &result.validation_result {
        lines.push(String::new());
        lines.push("Validation".to_string());
        lines.push(format!("  Errors: {}", validation.error_count()));
        lines.push(format!("  Warnings: {}", validation.warning_count()));
        push_items(&mut lines, validation.errors.iter().map(ToString::to_string));
    }

    if let Some(mapping) = &result.mapping_result {
        lines.push(String::new());
        lines.push("Mapping".to_string());
        lines.push(format!("  Mapped rows: {}", mapping.measurements.len()));
        lines.push(format!("  Errors: {}", mapping.errors.len()));
        push_items(&mut lines, mapping.errors.iter().map(ToString::to_string));
    }

    lines.push(String::new());
    lines.push("Result".to_string());
    lines.push(format!("  Processed: {}", result.total_processed));
    lines.push(format!("  Rejected rows: {}", result.total_errors));

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

/// List the first few items, then a count of the rest
fn push_items(lines: &mut Vec<String>, items: impl ExactSizeIterator<Item = String>) {
    let total = items.len();
    lines.extend(
        items
            .take(REPORT_FINDINGS_PER_STAGE)
            .map(|item| format!("  - {}", item)),
    );
    if total > REPORT_FINDINGS_PER_STAGE {
        lines.push(format!(
            "  ... and {} more",
            total - REPORT_FINDINGS_PER_STAGE
        ));
    }
}
