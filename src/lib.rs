//! MRV Import Library
//!
//! A Rust library for importing CO2-removal and wastewater-treatment
//! measurement spreadsheets into MRV (Measurement, Reporting and Verification)
//! measurement-creation requests.
//!
//! This library provides tools for:
//! - Parsing CSV text with quoted fields, duplicate-header and malformed-row detection
//! - Auto-detecting column mappings from English and Japanese header names
//! - Validating rows against physical plausibility ranges and warning bands
//! - Mapping rows into typed measurement requests with timestamp normalization
//! - Orchestrating the whole pipeline with summary statistics and fix suggestions
//! - Submitting results in API-sized batches through a pluggable sink

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod csv_parser;
        pub mod field_parsers;
        pub mod import_processor;
        pub mod mapper;
        pub mod measurement_sink;
        pub mod validator;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    ColumnMapping, ImportField, MeasurementCreateRequest, MeasurementField, MeasurementType,
    ParsedTable, Severity, ValidationFinding,
};
pub use app::services::csv_parser::{CsvParser, ParseError};
pub use app::services::import_processor::{ImportProcessor, ImportResult};
pub use config::ImportConfig;

/// Result type alias for the importer
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for import operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Structural CSV failure
    #[error("CSV parsing failed: {0}")]
    Parse(#[from] ParseError),

    /// CSV export error
    #[error("CSV export error: {message}")]
    CsvExport {
        message: String,
        #[source]
        source: csv::Error,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file could not be parsed
    #[error("Configuration file error in '{path}': {message}")]
    ConfigFile { path: String, message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Data validation error
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Timestamp did not match any supported format
    #[error("Invalid timestamp: '{value}'")]
    InvalidTimestamp { value: String },

    /// Measurement submission failed
    #[error("Submission error: {message}")]
    Submission { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV export error with context
    pub fn csv_export(message: impl Into<String>, source: csv::Error) -> Self {
        Self::CsvExport {
            message: message.into(),
            source,
        }
    }

    /// Create a JSON serialization error with context
    pub fn json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration file error
    pub fn config_file(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create an invalid timestamp error
    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value: value.into(),
        }
    }

    /// Create a submission error
    pub fn submission(message: impl Into<String>) -> Self {
        Self::Submission {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvExport {
            message: "CSV writing failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Json {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}
