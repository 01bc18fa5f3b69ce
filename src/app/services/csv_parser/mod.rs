//! CSV parser for measurement spreadsheets
//!
//! This module turns raw CSV text into a [`ParsedTable`](crate::app::models::ParsedTable):
//! a header list plus one header-keyed map per data row. Structural problems
//! (empty input, empty or duplicate headers, mostly-malformed files) abort the
//! parse; isolated malformed rows are dropped and reported.
//!
//! ## Architecture
//!
//! - [`tokenizer`] - Quote-aware line splitting state machine
//! - [`parser`] - Parse orchestration, header checks, preview limits
//! - [`column_detection`] - Header-to-field auto-detection
//! - [`template`] - Import template generation
//! - [`error`] - Structural parse failures
//!
//! ## Usage
//!
//! ```rust
//! use mrv_import::app::services::csv_parser::{CsvParser, ParserOptions};
//!
//! let parser = CsvParser::new(ParserOptions::default());
//! let table = parser.parse("timestamp,ph\n2025-07-28 09:00:00,7.2\n").unwrap();
//!
//! assert_eq!(table.headers, vec!["timestamp", "ph"]);
//! assert_eq!(table.total_row_count, 1);
//! ```

pub mod column_detection;
pub mod error;
pub mod parser;
pub mod template;
pub mod tokenizer;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use column_detection::{ColumnDetection, detect_column_mapping, detect_columns, detect_field};
pub use error::ParseError;
pub use parser::{CsvParser, ParserOptions};
pub use template::generate_template;
