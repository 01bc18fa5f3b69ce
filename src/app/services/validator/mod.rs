//! Row validation against plausibility rules
//!
//! This module checks parsed rows before they are mapped into measurement
//! requests. Errors block a row; warnings flag unusual but possible readings
//! for human review and never block.
//!
//! ## Architecture
//!
//! - [`rules`] - Per-field rule table (type, required, hard range, warning band)
//! - [`field_checks`] - Required, type and range checks for a single cell
//! - [`cross_checks`] - Coordinate pairing, region, temperature/pH, duplicate rows
//! - [`corrections`] - Advisory correction suggestions
//! - [`row_validator`] - The [`Validator`] tying the checks together
//!
//! ## Usage
//!
//! ```rust
//! use mrv_import::app::models::ColumnMapping;
//! use mrv_import::app::services::csv_parser::CsvParser;
//! use mrv_import::app::services::validator::Validator;
//!
//! let table = CsvParser::default()
//!     .parse("timestamp,ph\n2025-07-28 09:00:00,15\n")
//!     .unwrap();
//! let mapping = ColumnMapping::auto_detect(&table.headers);
//!
//! let result = Validator::default().validate(&table.rows, &mapping);
//! assert!(!result.is_valid);
//! assert_eq!(result.errors[0].column, "ph");
//! ```

pub mod corrections;
pub mod cross_checks;
pub mod field_checks;
pub mod row_validator;
pub mod rules;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use corrections::{CorrectionSuggestion, suggest_corrections};
pub use row_validator::{ValidationResult, Validator};
pub use rules::{RuleKind, RuleSet, ValidationRule};
