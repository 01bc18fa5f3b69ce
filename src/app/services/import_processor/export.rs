//! Findings and result export
//!
//! Findings from every stage are flattened into one CSV with a row per
//! finding; the full result can be written as pretty JSON.

use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use super::processor::ImportResult;
use crate::{Error, Result};

/// One finding, flattened for CSV export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FindingRecord {
    pub stage: &'static str,
    pub row: usize,
    pub column: String,
    pub value: String,
    pub severity: &'static str,
    pub kind: String,
    pub message: String,
}

/// Findings of all stages in stage order, then row order
pub fn finding_records(result: &ImportResult) -> Vec<FindingRecord> {
    let mut records = Vec::new();

    if let Some(table) = &result.parse_result {
        records.extend(table.row_errors.iter().map(|error| FindingRecord {
            stage: "parsing",
            row: error.row_number,
            column: String::new(),
            value: String::new(),
            severity: "error",
            kind: "malformed_row".to_string(),
            message: error.message.clone(),
        }));
    }

    if let Some(validation) = &result.validation_result {
        let mut findings: Vec<_> = validation
            .errors
            .iter()
            .chain(&validation.warnings)
            .collect();
        findings.sort_by_key(|finding| finding.row);

        records.extend(findings.into_iter().map(|finding| FindingRecord {
            stage: "validation",
            row: finding.row,
            column: finding.column.clone(),
            value: finding.value.clone(),
            severity: if finding.is_error() { "error" } else { "warning" },
            kind: enum_name(&finding.kind),
            message: finding.message.clone(),
        }));
    }

    if let Some(mapping) = &result.mapping_result {
        records.extend(mapping.errors.iter().map(|error| FindingRecord {
            stage: "mapping",
            row: error.row,
            column: error.field.clone(),
            value: error.value.clone(),
            severity: "error",
            kind: enum_name(&error.kind),
            message: error.message.clone(),
        }));
    }

    records
}

/// snake_case name of a unit enum variant, as serde writes it
fn enum_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        _ => String::new(),
    }
}

/// Write all findings as CSV, returning the number of records
pub fn write_findings_csv(result: &ImportResult, path: &Path) -> Result<usize> {
    let records = finding_records(result);
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| Error::csv_export(format!("Failed to create {}", path.display()), e))?;

    for record in &records {
        writer.serialize(record)?;
    }
    writer
        .flush()
        .map_err(|e| Error::io(format!("Failed to flush {}", path.display()), e))?;

    info!("Wrote {} findings to {}", records.len(), path.display());
    Ok(records.len())
}

/// Write the whole result as pretty-printed JSON
pub fn write_result_json(result: &ImportResult, path: &Path) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))?;
    serde_json::to_writer_pretty(BufWriter::new(file), result)
        .map_err(|e| Error::json(format!("Failed to write {}", path.display()), e))?;

    info!("Wrote import result to {}", path.display());
    Ok(())
}
