//! Numeric measurement values
//!
//! Cells are normalized (thousands separators and unit suffixes removed)
//! before parsing. A value outside its plausibility range rejects the row;
//! a cell that still is not a number is skipped.

use tracing::debug;

use super::error::{MappingError, MappingErrorKind};
use crate::app::models::{ColumnMapping, ImportField, MeasurementField, MeasurementValues, ParsedRow};
use crate::app::services::field_parsers::{in_range, normalize_numeric};

pub fn map_values(
    row: &ParsedRow,
    mapping: &ColumnMapping,
) -> Result<MeasurementValues, MappingError> {
    let mut values = MeasurementValues::default();

    for field in MeasurementField::ALL {
        let Some(raw) = row.field_value(mapping, ImportField::Value(field)) else {
            continue;
        };

        let Some(value) = normalize_numeric(raw) else {
            debug!(
                "Row {}: skipping non-numeric {} value '{}'",
                row.row_number, field, raw
            );
            continue;
        };

        let (min, max) = field.plausible_range();
        if !in_range(value, (min, max)) {
            return Err(MappingError::new(
                row.row_number,
                field.name(),
                raw,
                MappingErrorKind::OutOfRange,
                format!(
                    "{} value {} is outside the plausible range {} to {}",
                    field, value, min, max
                ),
            ));
        }

        values.set(field, value);
    }

    Ok(values)
}
