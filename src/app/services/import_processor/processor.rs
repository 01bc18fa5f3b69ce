//! Import pipeline orchestration
//!
//! Runs Parser -> Validator -> Mapper once each and folds their results into
//! an [`ImportResult`].

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::stats::{ImportSummary, MappingSummary, ParsingSummary, ValidationSummary};
use crate::app::models::{ColumnMapping, MeasurementCreateRequest, ParsedTable};
use crate::app::services::csv_parser::{CsvParser, ParseError};
use crate::app::services::mapper::{Mapper, MappingResult};
use crate::app::services::validator::{RuleSet, ValidationResult, Validator};
use crate::config::ImportConfig;
use crate::{Error, Result};

/// Everything one import run produced
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    /// True when the mapper succeeded and, in strict mode, validation was clean
    pub success: bool,

    /// Parsed table, absent when parsing failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_result: Option<ParsedTable>,

    /// Structural parse failure
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_parse_error"
    )]
    pub parse_error: Option<ParseError>,

    /// Mapping used for the run, explicit or auto-detected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_mapping: Option<ColumnMapping>,

    /// Reasons the column mapping could not be used
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mapping_problems: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_result: Option<ValidationResult>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping_result: Option<MappingResult>,

    /// Requests ready for submission, in row order
    pub final_measurements: Vec<MeasurementCreateRequest>,

    pub total_processed: usize,

    /// Distinct rejected rows
    pub total_errors: usize,

    #[serde(rename = "processingTimeMs", serialize_with = "serialize_millis")]
    pub processing_time: Duration,

    pub summary: ImportSummary,
}

fn serialize_parse_error<S: Serializer>(
    error: &Option<ParseError>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.serialize_str(&error.to_string()),
        None => serializer.serialize_none(),
    }
}

fn serialize_millis<S: Serializer>(
    duration: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

impl ImportResult {
    fn empty() -> Self {
        Self {
            success: false,
            parse_result: None,
            parse_error: None,
            column_mapping: None,
            mapping_problems: Vec::new(),
            validation_result: None,
            mapping_result: None,
            final_measurements: Vec::new(),
            total_processed: 0,
            total_errors: 0,
            processing_time: Duration::ZERO,
            summary: ImportSummary::default(),
        }
    }
}

/// Runs the import pipeline over CSV files or text
#[derive(Debug, Clone)]
pub struct ImportProcessor {
    config: ImportConfig,
    column_mapping: Option<ColumnMapping>,
    reference_time: Option<DateTime<Utc>>,
}

impl ImportProcessor {
    /// Create a processor; a mapping in the config is used unless one is set explicitly
    pub fn new(config: ImportConfig) -> Result<Self> {
        config.validate()?;
        let column_mapping = config.configured_mapping()?;

        Ok(Self {
            config,
            column_mapping,
            reference_time: None,
        })
    }

    /// Use this mapping instead of the configured or auto-detected one
    pub fn with_column_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.column_mapping = Some(mapping);
        self
    }

    /// Fix "now" for the future-date check
    pub fn with_reference_time(mut self, reference_time: DateTime<Utc>) -> Self {
        self.reference_time = Some(reference_time);
        self
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Read a file and run the pipeline over it
    ///
    /// Failing to read the file is an `Err`; everything after that, including
    /// non-UTF-8 content, is reported in the result.
    pub async fn process_file(&self, path: &Path) -> Result<ImportResult> {
        info!("Importing {}", path.display());
        let start = Instant::now();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;

        let result = match String::from_utf8(bytes) {
            Ok(text) => self.run(&text, start),
            Err(e) => Self::parse_failure(
                ParseError::Unreadable {
                    reason: format!("{} is not valid UTF-8 ({})", path.display(), e.utf8_error()),
                },
                start,
            ),
        };
        Ok(result)
    }

    /// Run the pipeline over CSV text
    pub fn process_content(&self, text: &str) -> ImportResult {
        self.run(text, Instant::now())
    }

    fn run(&self, text: &str, start: Instant) -> ImportResult {
        // Parse
        let table = match CsvParser::new(self.config.parser_options()).parse(text) {
            Ok(table) => table,
            Err(e) => return Self::parse_failure(e, start),
        };

        let mut result = ImportResult::empty();
        result.summary.total_rows = table.total_row_count;
        result.summary.parsing = ParsingSummary {
            success: true,
            total_rows: table.total_row_count,
            parsed_rows: table.rows.len(),
            malformed_rows: table.row_errors.len(),
            error: None,
        };

        // Resolve and check the column mapping
        let mapping = match &self.column_mapping {
            Some(mapping) => mapping.clone(),
            None => {
                let detected = ColumnMapping::auto_detect(&table.headers);
                debug!("Auto-detected {} mapped columns", detected.len());
                detected
            }
        };
        let problems = mapping.check_headers(&table.headers);
        if !problems.is_empty() {
            for problem in &problems {
                warn!("Column mapping problem: {}", problem);
            }
            result.mapping_problems = problems;
            result.column_mapping = Some(mapping);
            result.parse_result = Some(table);
            return Self::finish(result, start);
        }

        // Validate
        let mut validator = Validator::new(RuleSet::standard())
            .with_timezone_offset_hours(self.config.timezone_offset_hours);
        if let Some(reference_time) = self.reference_time {
            validator = validator.with_reference_time(reference_time);
        }
        let validation = validator.validate(&table.rows, &mapping);
        let validation_error_rows = validation.error_rows();
        let parse_error_rows: BTreeSet<usize> =
            table.row_errors.iter().map(|e| e.row_number).collect();

        result.summary.validation = ValidationSummary {
            performed: true,
            is_valid: validation.is_valid,
            error_count: validation.error_count(),
            warning_count: validation.warning_count(),
            rows_with_errors: validation_error_rows.len(),
        };

        if !self.config.skip_invalid_rows && !validation.is_valid {
            info!(
                "Validation found errors in {} rows, stopping before mapping",
                validation_error_rows.len()
            );
            result.total_errors = validation_error_rows.union(&parse_error_rows).count();
            result.validation_result = Some(validation);
            result.column_mapping = Some(mapping);
            result.parse_result = Some(table);
            return Self::finish(result, start);
        }

        // Map
        let mapping_result = Mapper::new(self.config.mapping_options()).map(&table, &mapping);
        let mapping_error_rows = mapping_result.error_rows();

        result.final_measurements = mapping_result
            .measurements
            .iter()
            .filter(|measurement| !validation_error_rows.contains(&measurement.row))
            .map(|measurement| measurement.request.clone())
            .collect();

        let rejected: BTreeSet<usize> = validation_error_rows
            .iter()
            .chain(&mapping_error_rows)
            .chain(&parse_error_rows)
            .copied()
            .collect();

        result.success =
            mapping_result.success && (self.config.skip_invalid_rows || validation.is_valid);
        result.total_processed = result.final_measurements.len();
        result.total_errors = rejected.len();
        result.summary.mapping = MappingSummary {
            performed: true,
            success: mapping_result.success,
            mapped_rows: mapping_result.measurements.len(),
            error_count: mapping_result.errors.len(),
        };

        result.mapping_result = Some(mapping_result);
        result.validation_result = Some(validation);
        result.column_mapping = Some(mapping);
        result.parse_result = Some(table);
        Self::finish(result, start)
    }

    fn parse_failure(error: ParseError, start: Instant) -> ImportResult {
        warn!("Parsing failed: {}", error);

        let mut result = ImportResult::empty();
        result.summary.parsing = ParsingSummary {
            success: false,
            error: Some(error.to_string()),
            ..ParsingSummary::default()
        };
        result.parse_error = Some(error);
        Self::finish(result, start)
    }

    fn finish(mut result: ImportResult, start: Instant) -> ImportResult {
        result.processing_time = start.elapsed();
        result.summary.total_processed = result.total_processed;
        result.summary.total_errors = result.total_errors;

        info!(
            "Import {}: {} ({:.2}s)",
            if result.success { "succeeded" } else { "failed" },
            result.summary.summary(),
            result.processing_time.as_secs_f64()
        );
        result
    }
}
