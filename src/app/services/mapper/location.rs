//! Location resolution from coordinate and site columns
//!
//! Coordinates are re-checked here even when the validator has run, because
//! the mapper is the last stage before a request leaves the pipeline.

use super::error::{MappingError, MappingErrorKind};
use crate::app::models::{ColumnMapping, Coordinates, ImportField, Location, ParsedRow};
use crate::app::services::field_parsers::{in_range, parse_number};
use crate::constants::ranges;

/// Build the location of a row
///
/// Latitude and longitude must be both present or both absent.
pub fn map_location(row: &ParsedRow, mapping: &ColumnMapping) -> Result<Location, MappingError> {
    let latitude = coordinate(row, mapping, ImportField::Latitude, ranges::LATITUDE)?;
    let longitude = coordinate(row, mapping, ImportField::Longitude, ranges::LONGITUDE)?;

    let coordinates = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(pairing_error(row, mapping, ImportField::Latitude, ImportField::Longitude));
        }
        (None, Some(_)) => {
            return Err(pairing_error(row, mapping, ImportField::Longitude, ImportField::Latitude));
        }
    };

    Ok(Location {
        coordinates,
        site_name: row
            .field_value(mapping, ImportField::SiteName)
            .map(str::to_string),
    })
}

fn pairing_error(
    row: &ParsedRow,
    mapping: &ColumnMapping,
    present: ImportField,
    missing: ImportField,
) -> MappingError {
    MappingError::new(
        row.row_number,
        missing.name(),
        row.field_value(mapping, present).unwrap_or(""),
        MappingErrorKind::CoordinatePairing,
        format!("{} is present but {} is missing", present, missing),
    )
}

fn coordinate(
    row: &ParsedRow,
    mapping: &ColumnMapping,
    field: ImportField,
    range: (f64, f64),
) -> Result<Option<f64>, MappingError> {
    let Some(raw) = row.field_value(mapping, field) else {
        return Ok(None);
    };

    match parse_number(raw) {
        Some(value) if in_range(value, range) => Ok(Some(value)),
        Some(_) => Err(MappingError::new(
            row.row_number,
            field.name(),
            raw,
            MappingErrorKind::InvalidCoordinate,
            format!("{} must be between {} and {}", field, range.0, range.1),
        )),
        None => Err(MappingError::new(
            row.row_number,
            field.name(),
            raw,
            MappingErrorKind::InvalidCoordinate,
            format!("{} is not a number", field),
        )),
    }
}
