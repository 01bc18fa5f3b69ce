//! Single-field checks: required, type, then range
//!
//! Checks run in that order and stop at the first failure for the field, so a
//! non-numeric cell never also reports a range error.

use chrono::{DateTime, FixedOffset, Utc};

use super::rules::{RuleKind, ValidationRule};
use crate::app::models::{FindingKind, ImportField, Severity, ValidationFinding};
use crate::app::services::field_parsers::{parse_number, parse_timestamp};

/// Inputs shared by every field check of a validation run
#[derive(Debug, Clone, Copy)]
pub struct CheckContext {
    pub local_offset: FixedOffset,
    pub reference_time: DateTime<Utc>,
}

/// Location of the cell under check
pub struct Cell<'a> {
    pub row: usize,
    pub column: &'a str,
    pub field: ImportField,
    pub value: &'a str,
}

impl Cell<'_> {
    fn finding(&self, kind: FindingKind, severity: Severity, message: String) -> ValidationFinding {
        ValidationFinding {
            row: self.row,
            column: self.column.to_string(),
            value: self.value.to_string(),
            message,
            severity,
            kind,
            field: Some(self.field),
        }
    }
}

/// Check one cell against its rule, appending any findings
pub fn check_field(
    cell: &Cell<'_>,
    rule: &ValidationRule,
    context: &CheckContext,
    findings: &mut Vec<ValidationFinding>,
) {
    let value = cell.value.trim();
    if value.is_empty() {
        if rule.required {
            findings.push(cell.finding(
                FindingKind::Required,
                Severity::Error,
                format!("{} is required", cell.field),
            ));
        }
        return;
    }

    match rule.kind {
        RuleKind::Date => check_date(cell, value, context, findings),
        RuleKind::Number => check_number(cell, value, rule, findings),
    }
}

fn check_date(
    cell: &Cell<'_>,
    value: &str,
    context: &CheckContext,
    findings: &mut Vec<ValidationFinding>,
) {
    match parse_timestamp(value, context.local_offset) {
        Ok(timestamp) if timestamp > context.reference_time => {
            findings.push(cell.finding(
                FindingKind::FutureDate,
                Severity::Error,
                "Date cannot be in the future".to_string(),
            ));
        }
        Ok(_) => {}
        Err(_) => {
            findings.push(cell.finding(
                FindingKind::InvalidDate,
                Severity::Error,
                "Invalid date format (expected e.g. YYYY-MM-DD HH:MM:SS)".to_string(),
            ));
        }
    }
}

fn check_number(
    cell: &Cell<'_>,
    value: &str,
    rule: &ValidationRule,
    findings: &mut Vec<ValidationFinding>,
) {
    let Some(number) = parse_number(value) else {
        findings.push(cell.finding(
            FindingKind::InvalidNumber,
            Severity::Error,
            "Value must be a number".to_string(),
        ));
        return;
    };

    if let Some((min, max)) = rule.range {
        if number < min || number > max {
            findings.push(cell.finding(
                FindingKind::OutOfRange,
                Severity::Error,
                format!("Value must be between {} and {}", min, max),
            ));
            return;
        }
    }

    if let Some(below) = rule.warn_below.filter(|below| number < *below) {
        findings.push(cell.finding(
            FindingKind::UnusualValue,
            Severity::Warning,
            format!("Unusual value: below the typical minimum of {}", below),
        ));
    } else if let Some(above) = rule.warn_above.filter(|above| number > *above) {
        findings.push(cell.finding(
            FindingKind::UnusualValue,
            Severity::Warning,
            format!("Unusual value: above the typical maximum of {}", above),
        ));
    }
}
