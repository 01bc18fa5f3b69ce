//! Row-level and table-level checks spanning several fields

use std::collections::HashMap;

use crate::app::models::{
    ColumnMapping, FindingKind, ImportField, MeasurementField, ParsedRow, Severity,
    ValidationFinding,
};
use crate::app::services::field_parsers::{in_range, parse_number};
use crate::constants::{
    HOT_WATER_MAX_PH, HOT_WATER_MIN_PH, HOT_WATER_TEMPERATURE, japan_bounds, ranges,
};

const PH: ImportField = ImportField::Value(MeasurementField::Ph);
const TEMPERATURE: ImportField = ImportField::Value(MeasurementField::Temperature);

/// Header used in findings for a field, falling back to the field name
fn column_for(mapping: &ColumnMapping, field: ImportField) -> String {
    mapping
        .get(field)
        .map_or_else(|| field.name().to_string(), str::to_string)
}

/// Latitude and longitude must be both present or both absent
///
/// A latitude mapped without a longitude column counts as a missing longitude.
pub fn check_coordinate_pairing(
    row: &ParsedRow,
    mapping: &ColumnMapping,
    findings: &mut Vec<ValidationFinding>,
) {
    let latitude = row.field_value(mapping, ImportField::Latitude);
    let longitude = row.field_value(mapping, ImportField::Longitude);

    let (missing, present) = match (latitude, longitude) {
        (Some(lat), None) => (ImportField::Longitude, lat),
        (None, Some(lon)) => (ImportField::Latitude, lon),
        _ => return,
    };

    findings.push(ValidationFinding {
        row: row.row_number,
        column: column_for(mapping, missing),
        value: present.to_string(),
        message: "Latitude and longitude must be provided together".to_string(),
        severity: Severity::Error,
        kind: FindingKind::CoordinatePairing,
        field: Some(missing),
    });
}

/// Warn when valid coordinates fall outside Japan's bounding box
pub fn check_region(
    row: &ParsedRow,
    mapping: &ColumnMapping,
    findings: &mut Vec<ValidationFinding>,
) {
    let coordinate = |field, range| {
        row.field_value(mapping, field)
            .and_then(parse_number)
            .filter(|value| in_range(*value, range))
    };
    let (Some(latitude), Some(longitude)) = (
        coordinate(ImportField::Latitude, ranges::LATITUDE),
        coordinate(ImportField::Longitude, ranges::LONGITUDE),
    ) else {
        return;
    };

    let inside = in_range(
        latitude,
        (japan_bounds::MIN_LATITUDE, japan_bounds::MAX_LATITUDE),
    ) && in_range(
        longitude,
        (japan_bounds::MIN_LONGITUDE, japan_bounds::MAX_LONGITUDE),
    );

    if !inside {
        findings.push(ValidationFinding {
            row: row.row_number,
            column: format!(
                "{}/{}",
                column_for(mapping, ImportField::Latitude),
                column_for(mapping, ImportField::Longitude)
            ),
            value: format!("{}, {}", latitude, longitude),
            message: "Coordinates are outside Japan".to_string(),
            severity: Severity::Warning,
            kind: FindingKind::OutsideRegion,
            field: None,
        });
    }
}

/// Warn about hot water with an extreme pH
pub fn check_temperature_ph(
    row: &ParsedRow,
    mapping: &ColumnMapping,
    findings: &mut Vec<ValidationFinding>,
) {
    let reading = |field| row.field_value(mapping, field).and_then(parse_number);
    let (Some(temperature), Some(ph)) = (reading(TEMPERATURE), reading(PH)) else {
        return;
    };

    if temperature > HOT_WATER_TEMPERATURE && (ph < HOT_WATER_MIN_PH || ph > HOT_WATER_MAX_PH) {
        findings.push(ValidationFinding {
            row: row.row_number,
            column: column_for(mapping, PH),
            value: ph.to_string(),
            message: format!(
                "pH {} is unlikely at a water temperature of {}°C",
                ph, temperature
            ),
            severity: Severity::Warning,
            kind: FindingKind::Implausible,
            field: Some(PH),
        });
    }
}

/// Tracks (timestamp, latitude, longitude) keys across a table
#[derive(Debug, Default)]
pub struct DuplicateTracker {
    first_seen: HashMap<String, usize>,
}

impl DuplicateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag a row whose key matches an earlier row
    ///
    /// Rows without a timestamp value are never keyed.
    pub fn check(
        &mut self,
        row: &ParsedRow,
        mapping: &ColumnMapping,
        findings: &mut Vec<ValidationFinding>,
    ) {
        let Some(timestamp) = row.field_value(mapping, ImportField::Timestamp) else {
            return;
        };
        let latitude = row.field_value(mapping, ImportField::Latitude).unwrap_or("");
        let longitude = row.field_value(mapping, ImportField::Longitude).unwrap_or("");
        let key = format!("{}_{}_{}", timestamp, latitude, longitude);

        match self.first_seen.get(&key) {
            Some(first_row) => findings.push(ValidationFinding {
                row: row.row_number,
                column: column_for(mapping, ImportField::Timestamp),
                value: timestamp.to_string(),
                message: format!(
                    "Duplicate of row {} (same timestamp and location)",
                    first_row
                ),
                severity: Severity::Error,
                kind: FindingKind::Duplicate,
                field: Some(ImportField::Timestamp),
            }),
            None => {
                self.first_seen.insert(key, row.row_number);
            }
        }
    }
}
