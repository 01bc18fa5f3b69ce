//! Test utilities for validator testing
//!
//! This module provides a fixed reference time and helpers that turn CSV text
//! into rows plus an auto-detected mapping.

use chrono::{DateTime, TimeZone, Utc};

use super::{ValidationResult, Validator};
use crate::app::models::{ColumnMapping, FindingKind, ParsedRow};
use crate::app::services::csv_parser::{CsvParser, ParserOptions};


/// "Now" for every validator test
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

pub fn test_validator() -> Validator {
    Validator::default().with_reference_time(reference_time())
}

/// Parse every row of `content` and auto-detect its mapping
pub fn rows_and_mapping(content: &str) -> (Vec<ParsedRow>, ColumnMapping) {
    let table = CsvParser::new(ParserOptions::full())
        .parse(content)
        .expect("test CSV should parse");
    let mapping = ColumnMapping::auto_detect(&table.headers);
    (table.rows, mapping)
}

/// Validate `content` with the auto-detected mapping
pub fn validate_csv(content: &str) -> ValidationResult {
    let (rows, mapping) = rows_and_mapping(content);
    test_validator().validate(&rows, &mapping)
}

/// Kinds of all errors, in order
pub fn error_kinds(result: &ValidationResult) -> Vec<FindingKind> {
    result.errors.iter().map(|finding| finding.kind).collect()
}

/// Kinds of all warnings, in order
pub fn warning_kinds(result: &ValidationResult) -> Vec<FindingKind> {
    result.warnings.iter().map(|finding| finding.kind).collect()
}
