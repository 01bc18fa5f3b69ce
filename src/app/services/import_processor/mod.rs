//! Import pipeline orchestration
//!
//! This module sequences the parser, validator and mapper over one CSV file,
//! aggregates their results, and renders reports and fix suggestions.
//!
//! ## Architecture
//!
//! - [`processor`] - The [`ImportProcessor`] and its [`ImportResult`]
//! - [`stats`] - Per-stage counters and overall totals
//! - [`report`] - Plain-text report rendering
//! - [`suggestions`] - Correction and hint aggregation
//! - [`export`] - Findings CSV and result JSON output
//!
//! ## Usage
//!
//! ```rust
//! use mrv_import::{ImportConfig, ImportProcessor};
//!
//! let config = ImportConfig::default()
//!     .with_project_id("proj-001")
//!     .with_skip_invalid_rows(true);
//! let processor = ImportProcessor::new(config).unwrap();
//!
//! let result = processor.process_content("timestamp,ph\n2025-07-28 09:00:00,7.2\n");
//! assert!(result.success);
//! assert_eq!(result.total_processed, 1);
//! ```

pub mod export;
pub mod processor;
pub mod report;
pub mod stats;
pub mod suggestions;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use export::{FindingRecord, finding_records, write_findings_csv, write_result_json};
pub use processor::{ImportProcessor, ImportResult};
pub use stats::{ImportSummary, MappingSummary, ParsingSummary, ValidationSummary};

impl ImportResult {
    /// Plain-text report of the run
    pub fn render_report(&self) -> String {
        report::render_report(self)
    }

    /// Corrections and hints for the problems found
    pub fn suggest_fixes(&self) -> Vec<String> {
        suggestions::suggest_fixes(self)
    }
}
