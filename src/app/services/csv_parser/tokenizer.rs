//! Quote-aware line splitting
//!
//! A small state machine over the characters of one line: it tracks whether
//! the cursor is inside double quotes, splits on the delimiter only outside
//! quotes, and turns a doubled quote (`""`) inside a quoted field into a
//! literal quote. One layer of surrounding quotes is stripped per field.

use thiserror::Error;

/// Reasons a single line cannot be split into fields
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("Unterminated quoted field")]
    UnterminatedQuote,

    #[error("Row has {found} columns but the header has {expected}")]
    TooManyColumns { found: usize, expected: usize },
}

/// Split one CSV line into trimmed, unquoted fields
pub fn split_line(line: &str, delimiter: char) -> Result<Vec<String>, LineError> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                current.push('"');
                chars.next();
            } else {
                in_quotes = !in_quotes;
                current.push('"');
            }
        } else if c == delimiter && !in_quotes {
            fields.push(finish_field(&current));
            current.clear();
        } else {
            current.push(c);
        }
    }

    if in_quotes {
        return Err(LineError::UnterminatedQuote);
    }

    fields.push(finish_field(&current));
    Ok(fields)
}

/// Split a data line and align it with `column_count` header columns
///
/// Short rows are padded with empty cells. Surplus cells are tolerated only
/// when blank (trailing delimiters from spreadsheet exports).
pub fn split_row(line: &str, delimiter: char, column_count: usize) -> Result<Vec<String>, LineError> {
    let mut cells = split_line(line, delimiter)?;

    if cells.len() > column_count {
        if cells[column_count..].iter().any(|cell| !cell.is_empty()) {
            return Err(LineError::TooManyColumns {
                found: cells.len(),
                expected: column_count,
            });
        }
        cells.truncate(column_count);
    }

    cells.resize(column_count, String::new());
    Ok(cells)
}

fn finish_field(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(trimmed)
        .to_string()
}
