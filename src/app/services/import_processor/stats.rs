//! Summary statistics for an import run
//!
//! This module provides per-stage counters and the overall totals reported
//! by the processor, the CLI, and the JSON output.

use serde::Serialize;

/// Parser stage counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsingSummary {
    pub success: bool,

    /// Data rows in the file
    pub total_rows: usize,

    /// Rows successfully split into cells
    pub parsed_rows: usize,

    /// Rows dropped as malformed
    pub malformed_rows: usize,

    /// Structural failure, when parsing aborted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Validator stage counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// False when an earlier stage stopped the run
    pub performed: bool,
    pub is_valid: bool,
    pub error_count: usize,
    pub warning_count: usize,
    pub rows_with_errors: usize,
}

/// Mapper stage counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingSummary {
    /// False when an earlier stage stopped the run
    pub performed: bool,
    pub success: bool,
    pub mapped_rows: usize,
    pub error_count: usize,
}

/// Totals across all stages
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub parsing: ParsingSummary,
    pub validation: ValidationSummary,
    pub mapping: MappingSummary,

    /// Data rows in the file
    pub total_rows: usize,

    /// Measurements ready for submission
    pub total_processed: usize,

    /// Distinct rows rejected by any stage
    pub total_errors: usize,
}

impl ImportSummary {
    /// Share of data rows that became measurements, as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.total_processed as f64 / self.total_rows as f64) * 100.0
        }
    }

    /// Share of data rows that were rejected, as a percentage
    pub fn error_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.total_errors as f64 / self.total_rows as f64) * 100.0
        }
    }

    /// One-line description of the run
    pub fn summary(&self) -> String {
        format!(
            "{} of {} rows imported ({:.1}%), {} rejected, {} warnings",
            self.total_processed,
            self.total_rows,
            self.success_rate(),
            self.total_errors,
            self.validation.warning_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates() {
        let summary = ImportSummary {
            total_rows: 4,
            total_processed: 3,
            total_errors: 1,
            ..ImportSummary::default()
        };

        assert_eq!(summary.success_rate(), 75.0);
        assert_eq!(summary.error_rate(), 25.0);
        assert!(summary.summary().starts_with("3 of 4 rows imported (75.0%)"));
    }

    #[test]
    fn test_rates_with_no_rows() {
        let summary = ImportSummary::default();
        assert_eq!(summary.success_rate(), 0.0);
        assert_eq!(summary.error_rate(), 0.0);
    }
}
