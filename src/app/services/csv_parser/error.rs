//! Structural parse failures
//!
//! These abort a parse before any row is processed and surface as a single
//! top-level failure of an import run.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("The file contains no data")]
    EmptyInput,

    #[error("The header row contains no column names")]
    EmptyHeader,

    #[error("The header row could not be parsed: {reason}")]
    MalformedHeader { reason: String },

    #[error("Duplicate column names: {}", names.join(", "))]
    DuplicateHeader { names: Vec<String> },

    #[error(
        "Too many malformed rows: {failed} of {attempted} rows failed to parse ({})",
        samples.join("; ")
    )]
    TooManyParseErrors {
        failed: usize,
        attempted: usize,
        samples: Vec<String>,
    },

    #[error("The file could not be read: {reason}")]
    Unreadable { reason: String },
}

impl ParseError {
    /// Short machine-friendly code for summaries and exports
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::EmptyInput => "empty_input",
            ParseError::EmptyHeader => "empty_header",
            ParseError::MalformedHeader { .. } => "malformed_header",
            ParseError::DuplicateHeader { .. } => "duplicate_header",
            ParseError::TooManyParseErrors { .. } => "too_many_parse_errors",
            ParseError::Unreadable { .. } => "unreadable",
        }
    }
}
