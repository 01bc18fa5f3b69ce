//! Validator over parsed rows

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

use super::corrections::{CorrectionSuggestion, suggest_corrections};
use super::cross_checks::{
    DuplicateTracker, check_coordinate_pairing, check_region, check_temperature_ph,
};
use super::field_checks::{Cell, CheckContext, check_field};
use super::rules::RuleSet;
use crate::app::models::{ColumnMapping, ParsedRow, Severity, ValidationFinding};
use crate::app::services::field_parsers::offset_from_hours;
use crate::constants::DEFAULT_TIMEZONE_OFFSET_HOURS;

/// Errors and warnings found in a set of rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True when no error was found
    pub is_valid: bool,
    pub errors: Vec<ValidationFinding>,
    pub warnings: Vec<ValidationFinding>,
}

impl ValidationResult {
    fn from_findings(findings: Vec<ValidationFinding>) -> Self {
        let (errors, warnings): (Vec<_>, Vec<_>) = findings
            .into_iter()
            .partition(|finding| finding.severity == Severity::Error);

        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Row numbers that carry at least one error
    pub fn error_rows(&self) -> BTreeSet<usize> {
        self.errors.iter().map(|finding| finding.row).collect()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

/// Applies a rule set plus cross-field checks to parsed rows
///
/// Validation holds no state between calls: validating the same rows twice
/// yields identical results.
#[derive(Debug, Clone)]
pub struct Validator {
    rules: RuleSet,
    local_offset: FixedOffset,
    reference_time: Option<DateTime<Utc>>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(RuleSet::standard())
    }
}

impl Validator {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            local_offset: offset_from_hours(DEFAULT_TIMEZONE_OFFSET_HOURS),
            reference_time: None,
        }
    }

    /// Offset used for timestamps written without a zone
    pub fn with_timezone_offset_hours(mut self, hours: i32) -> Self {
        self.local_offset = offset_from_hours(hours);
        self
    }

    /// Fix "now" for the future-date check (defaults to the current time)
    pub fn with_reference_time(mut self, reference_time: DateTime<Utc>) -> Self {
        self.reference_time = Some(reference_time);
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Validate rows against the rules for every mapped field
    pub fn validate(&self, rows: &[ParsedRow], mapping: &ColumnMapping) -> ValidationResult {
        let context = CheckContext {
            local_offset: self.local_offset,
            reference_time: self.reference_time.unwrap_or_else(Utc::now),
        };

        let mut findings = Vec::new();
        let mut duplicates = DuplicateTracker::new();

        for row in rows {
            let before = findings.len();

            for (field, column) in mapping.iter() {
                let Some(rule) = self.rules.rule(field) else {
                    continue;
                };
                let cell = Cell {
                    row: row.row_number,
                    column,
                    field,
                    value: row.raw(column).unwrap_or(""),
                };
                check_field(&cell, rule, &context, &mut findings);
            }

            check_coordinate_pairing(row, mapping, &mut findings);
            check_region(row, mapping, &mut findings);
            check_temperature_ph(row, mapping, &mut findings);
            duplicates.check(row, mapping, &mut findings);

            for finding in &findings[before..] {
                debug!("{:?}: {}", finding.severity, finding);
            }
        }

        let result = ValidationResult::from_findings(findings);
        info!(
            "Validated {} rows: {} errors, {} warnings",
            rows.len(),
            result.error_count(),
            result.warning_count()
        );
        result
    }

    /// Advisory fixes for validation errors
    pub fn suggest_corrections(findings: &[ValidationFinding]) -> Vec<CorrectionSuggestion> {
        suggest_corrections(findings)
    }
}
