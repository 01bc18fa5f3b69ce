//! Test utilities for CSV parser testing
//!
//! This module provides sample CSV content and helpers shared by the parser,
//! tokenizer, and column detection tests.

use std::io::Write;
use tempfile::NamedTempFile;

use super::{CsvParser, ParserOptions};
use crate::app::models::ParsedTable;

mod parser_tests;
mod tokenizer_tests;

/// Two well-formed water quality rows
pub const SIMPLE_CSV: &str = "timestamp,ph,temperature\n\
2025-07-28 09:00:00,7.2,25.5\n\
2025-07-28 12:00:00,7.0,26.1\n";

/// Build CSV text with `rows` numbered data lines
pub fn numbered_csv(rows: usize) -> String {
    let mut content = String::from("timestamp,ph\n");
    for i in 0..rows {
        content.push_str(&format!("2025-07-28 {:02}:00:00,7.{}\n", i % 24, i % 10));
    }
    content
}

/// Parse with default preview options, panicking on structural failure
pub fn parse_preview(content: &str) -> ParsedTable {
    CsvParser::new(ParserOptions::default())
        .parse(content)
        .expect("content should parse")
}

/// Parse every row, panicking on structural failure
pub fn parse_full(content: &str) -> ParsedTable {
    CsvParser::new(ParserOptions::full())
        .parse(content)
        .expect("content should parse")
}

/// Write content to a temporary file
pub fn create_temp_csv(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}
