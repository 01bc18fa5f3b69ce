//! Row-to-request mapping

use chrono::FixedOffset;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use super::error::{MappingError, MappingErrorKind};
use super::location::map_location;
use super::type_detection::detect_type;
use super::values::map_values;
use crate::app::models::{
    ColumnMapping, ImportField, MeasurementCreateRequest, MeasurementType, ParsedRow, ParsedTable,
};
use crate::app::services::field_parsers::{offset_from_hours, parse_timestamp};
use crate::constants::DEFAULT_TIMEZONE_OFFSET_HOURS;

/// Settings applied to every row of a mapping run
#[derive(Debug, Clone, PartialEq)]
pub struct MappingOptions {
    pub project_id: String,

    /// Type used when the type column is absent or unrecognized
    pub default_type: MeasurementType,

    /// Drop failing rows and continue instead of aborting the batch
    pub skip_invalid_rows: bool,

    pub operator_id: Option<String>,
    pub device_id: Option<String>,

    /// UTC offset for timestamps written without a zone
    pub timezone_offset_hours: i32,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            default_type: MeasurementType::default(),
            skip_invalid_rows: false,
            operator_id: None,
            device_id: None,
            timezone_offset_hours: DEFAULT_TIMEZONE_OFFSET_HOURS,
        }
    }
}

impl MappingOptions {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Self::default()
        }
    }

    pub fn with_default_type(mut self, default_type: MeasurementType) -> Self {
        self.default_type = default_type;
        self
    }

    pub fn with_skip_invalid_rows(mut self, skip: bool) -> Self {
        self.skip_invalid_rows = skip;
        self
    }

    pub fn with_operator_id(mut self, operator_id: impl Into<String>) -> Self {
        self.operator_id = Some(operator_id.into());
        self
    }

    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    pub fn with_timezone_offset_hours(mut self, hours: i32) -> Self {
        self.timezone_offset_hours = hours;
        self
    }
}

/// A request together with the CSV row it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedMeasurement {
    pub row: usize,
    pub request: MeasurementCreateRequest,
}

/// Outcome of mapping a set of rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingResult {
    /// False only when strict mapping aborted on a row error
    pub success: bool,
    pub measurements: Vec<MappedMeasurement>,
    pub errors: Vec<MappingError>,
}

impl MappingResult {
    /// Requests in row order
    pub fn requests(&self) -> Vec<MeasurementCreateRequest> {
        self.measurements
            .iter()
            .map(|measurement| measurement.request.clone())
            .collect()
    }

    /// Row numbers that failed to map
    pub fn error_rows(&self) -> BTreeSet<usize> {
        self.errors.iter().map(|error| error.row).collect()
    }
}

/// Converts parsed rows into measurement-creation requests
#[derive(Debug, Clone)]
pub struct Mapper {
    options: MappingOptions,
    local_offset: FixedOffset,
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new(MappingOptions::default())
    }
}

impl Mapper {
    pub fn new(options: MappingOptions) -> Self {
        let local_offset = offset_from_hours(options.timezone_offset_hours);
        Self {
            options,
            local_offset,
        }
    }

    pub fn options(&self) -> &MappingOptions {
        &self.options
    }

    /// Map every materialized row of a parsed table
    pub fn map(&self, table: &ParsedTable, mapping: &ColumnMapping) -> MappingResult {
        self.map_rows(&table.rows, mapping)
    }

    /// Map rows in order
    ///
    /// In strict mode the first failing row aborts the batch with no
    /// measurements; otherwise failing rows are recorded and skipped.
    pub fn map_rows(&self, rows: &[ParsedRow], mapping: &ColumnMapping) -> MappingResult {
        let mut result = MappingResult {
            success: true,
            ..MappingResult::default()
        };

        for row in rows {
            match self.map_row(row, mapping) {
                Ok(request) => result.measurements.push(MappedMeasurement {
                    row: row.row_number,
                    request,
                }),
                Err(error) if self.options.skip_invalid_rows => {
                    debug!("Skipping row: {}", error);
                    result.errors.push(error);
                }
                Err(error) => {
                    warn!("Mapping aborted: {}", error);
                    return MappingResult {
                        success: false,
                        measurements: Vec::new(),
                        errors: vec![error],
                    };
                }
            }
        }

        info!(
            "Mapped {} of {} rows ({} rejected)",
            result.measurements.len(),
            rows.len(),
            result.errors.len()
        );
        result
    }

    /// Build the request for a single row
    pub fn map_row(
        &self,
        row: &ParsedRow,
        mapping: &ColumnMapping,
    ) -> Result<MeasurementCreateRequest, MappingError> {
        let field = ImportField::Timestamp.name();
        let raw_timestamp = row.field_value(mapping, ImportField::Timestamp);

        let timestamp = match raw_timestamp {
            None => {
                return Err(MappingError::new(
                    row.row_number,
                    field,
                    "",
                    MappingErrorKind::MissingTimestamp,
                    "Timestamp is missing",
                ));
            }
            Some(raw) => parse_timestamp(raw, self.local_offset).map_err(|e| {
                MappingError::new(
                    row.row_number,
                    field,
                    raw,
                    MappingErrorKind::MissingTimestamp,
                    format!("Timestamp could not be parsed ({})", e),
                )
            })?,
        };

        let measurement_type = detect_type(
            row.field_value(mapping, ImportField::Type),
            self.options.default_type,
        );
        let location = map_location(row, mapping)?;
        let values = map_values(row, mapping)?;

        Ok(MeasurementCreateRequest {
            project_id: self.options.project_id.clone(),
            timestamp,
            measurement_type,
            location,
            values,
            notes: row
                .field_value(mapping, ImportField::Notes)
                .map(str::to_string),
            operator_id: self.options.operator_id.clone(),
            device_id: self.options.device_id.clone(),
        })
    }
}
