//! Row-level mapping failures

use serde::Serialize;
use std::fmt;

/// Why a row could not be turned into a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingErrorKind {
    /// Timestamp absent or in no recognized format
    MissingTimestamp,
    /// Latitude/longitude not a number or outside ±90/±180
    InvalidCoordinate,
    /// Only one of latitude/longitude present
    CoordinatePairing,
    /// Numeric value outside its plausibility range
    OutOfRange,
}

/// A rejected row, with enough context to render a diagnostic
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingError {
    pub row: usize,
    pub field: String,
    pub value: String,
    pub kind: MappingErrorKind,
    pub message: String,
}

impl MappingError {
    pub fn new(
        row: usize,
        field: impl Into<String>,
        value: impl Into<String>,
        kind: MappingErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row,
            field: field.into(),
            value: value.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}, {}: {}", self.row, self.field, self.message)
    }
}
