//! Mapping of parsed rows into measurement-creation requests
//!
//! The mapper resolves the timestamp through the cascading parser, detects the
//! measurement type from keywords, builds the location, and normalizes numeric
//! values. The timestamp is the only field whose absence rejects a row; every
//! other field is best-effort, except that coordinates and numeric values
//! outside their plausibility ranges reject the row.
//!
//! ## Architecture
//!
//! - [`row_mapper`] - The [`Mapper`], its options and result types
//! - [`type_detection`] - Japanese/English measurement type keywords
//! - [`location`] - Coordinate pairing and range checks, site name
//! - [`values`] - Numeric normalization and plausibility ranges
//! - [`batching`] - Order-preserving chunking for submission
//! - [`error`] - Row-level mapping failures

pub mod batching;
pub mod error;
pub mod location;
pub mod row_mapper;
pub mod type_detection;
pub mod values;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use batching::chunk_measurements;
pub use error::{MappingError, MappingErrorKind};
pub use row_mapper::{MappedMeasurement, Mapper, MappingOptions, MappingResult};
pub use type_detection::detect_type;
