//! Core CSV parser implementation
//!
//! This module provides the parse orchestration: line splitting, header
//! checks, row materialization up to the preview limit, and the malformed-row
//! threshold.

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use super::column_detection::{ColumnDetection, detect_columns};
use super::error::ParseError;
use super::template::generate_template;
use super::tokenizer::{split_line, split_row};
use crate::app::models::{ParsedRow, ParsedTable, RowParseError};
use crate::constants::{
    DEFAULT_DELIMITER, DEFAULT_MAX_PREVIEW_ROWS, HEADER_ROW_NUMBER, MAX_ROW_PARSE_FAILURE_RATIO,
    PARSE_ERROR_SAMPLE_COUNT, UTF8_BOM,
};

/// Parser settings
#[derive(Debug, Clone, PartialEq)]
pub struct ParserOptions {
    /// Field delimiter
    pub delimiter: char,

    /// Maximum number of data rows to materialize (`None` = every row)
    pub max_preview_rows: Option<usize>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            max_preview_rows: Some(DEFAULT_MAX_PREVIEW_ROWS),
        }
    }
}

impl ParserOptions {
    /// Options that materialize every data row
    pub fn full() -> Self {
        Self {
            max_preview_rows: None,
            ..Self::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_max_preview_rows(mut self, max_rows: usize) -> Self {
        self.max_preview_rows = Some(max_rows);
        self
    }
}

/// CSV parser for measurement spreadsheets
#[derive(Debug, Clone, Default)]
pub struct CsvParser {
    options: ParserOptions,
}

impl CsvParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Read a file as UTF-8 and parse it
    pub async fn parse_file(&self, path: &Path) -> Result<ParsedTable, ParseError> {
        info!("Parsing CSV file: {}", path.display());

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ParseError::Unreadable {
                reason: format!("{}: {}", path.display(), e),
            })?;

        let text = String::from_utf8(bytes).map_err(|e| ParseError::Unreadable {
            reason: format!("{} is not valid UTF-8 ({})", path.display(), e.utf8_error()),
        })?;

        self.parse(&text)
    }

    /// Parse CSV text into headers and header-keyed rows
    pub fn parse(&self, text: &str) -> Result<ParsedTable, ParseError> {
        let text = match text.strip_prefix(UTF8_BOM) {
            Some(stripped) => {
                debug!("Stripped UTF-8 byte order mark");
                stripped
            }
            None => text,
        };

        let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
        let (header_line, data_lines) = lines.split_first().ok_or(ParseError::EmptyInput)?;

        let columns = self.parse_header(header_line)?;
        let headers: Vec<String> = columns.iter().filter(|c| !c.is_empty()).cloned().collect();

        let attempted = self
            .options
            .max_preview_rows
            .map_or(data_lines.len(), |max| max.min(data_lines.len()));

        let mut rows = Vec::with_capacity(attempted);
        let mut row_errors = Vec::new();

        for (index, line) in data_lines.iter().take(attempted).enumerate() {
            let row_number = HEADER_ROW_NUMBER + 1 + index;

            match split_row(line, self.options.delimiter, columns.len()) {
                Ok(cells) => {
                    let values: HashMap<String, String> = columns
                        .iter()
                        .zip(cells)
                        .filter(|(column, _)| !column.is_empty())
                        .map(|(column, cell)| (column.clone(), cell))
                        .collect();
                    rows.push(ParsedRow { row_number, values });
                }
                Err(e) => {
                    debug!("Skipped row {}: {}", row_number, e);
                    row_errors.push(RowParseError {
                        row_number,
                        message: e.to_string(),
                    });
                }
            }
        }

        if attempted > 0
            && row_errors.len() as f64 / attempted as f64 > MAX_ROW_PARSE_FAILURE_RATIO
        {
            warn!(
                "{} of {} rows failed to parse, rejecting file",
                row_errors.len(),
                attempted
            );
            return Err(ParseError::TooManyParseErrors {
                failed: row_errors.len(),
                attempted,
                samples: row_errors
                    .iter()
                    .take(PARSE_ERROR_SAMPLE_COUNT)
                    .map(|e| format!("Row {}: {}", e.row_number, e.message))
                    .collect(),
            });
        }

        info!(
            "Parsed {} columns, {} of {} data rows ({} malformed)",
            headers.len(),
            rows.len(),
            data_lines.len(),
            row_errors.len()
        );

        Ok(ParsedTable {
            headers,
            preview_row_count: rows.len(),
            total_row_count: data_lines.len(),
            rows,
            row_errors,
        })
    }

    /// CSV import template (standard headers plus sample rows)
    pub fn generate_template() -> String {
        generate_template()
    }

    /// Guess a logical field for each header
    pub fn detect_columns(headers: &[String]) -> Vec<ColumnDetection> {
        detect_columns(headers)
    }

    /// Split the header line and check for blank and duplicate names
    ///
    /// Blank header cells keep their position (so data cells stay aligned)
    /// but are not addressable.
    fn parse_header(&self, line: &str) -> Result<Vec<String>, ParseError> {
        // Quoted names keep inner padding from the tokenizer, headers never do
        let columns: Vec<String> = split_line(line, self.options.delimiter)
            .map_err(|e| ParseError::MalformedHeader {
                reason: e.to_string(),
            })?
            .into_iter()
            .map(|column| column.trim().to_string())
            .collect();

        if columns.iter().all(|column| column.is_empty()) {
            return Err(ParseError::EmptyHeader);
        }

        let mut seen: HashMap<String, &str> = HashMap::new();
        let mut duplicates: Vec<String> = Vec::new();
        for column in columns.iter().filter(|c| !c.is_empty()) {
            let normalized = column.to_lowercase();
            if let Some(first) = seen.get(&normalized) {
                if !duplicates.iter().any(|d| d.to_lowercase() == normalized) {
                    duplicates.push((*first).to_string());
                }
            } else {
                seen.insert(normalized, column);
            }
        }

        if !duplicates.is_empty() {
            return Err(ParseError::DuplicateHeader { names: duplicates });
        }

        Ok(columns)
    }
}
