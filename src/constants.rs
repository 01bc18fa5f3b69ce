//! Application constants for the measurement import pipeline
//!
//! This module contains the plausibility ranges, warning bands, parser limits,
//! and template content used throughout the importer.

// =============================================================================
// Parser Configuration Defaults
// =============================================================================

/// Default field delimiter for CSV input
pub const DEFAULT_DELIMITER: char = ',';

/// Default number of data rows materialized by a preview parse
pub const DEFAULT_MAX_PREVIEW_ROWS: usize = 10;

/// Share of failed row parses (0.0-1.0) above which a whole parse is rejected
pub const MAX_ROW_PARSE_FAILURE_RATIO: f64 = 0.5;

/// Number of sample messages carried by a "too many parse errors" failure
pub const PARSE_ERROR_SAMPLE_COUNT: usize = 3;

/// UTF-8 byte order mark some spreadsheet tools prepend to exports
pub const UTF8_BOM: char = '\u{feff}';

/// Row number of the header line; the first data row is `HEADER_ROW_NUMBER + 1`
pub const HEADER_ROW_NUMBER: usize = 1;

// =============================================================================
// Mapping and Submission Defaults
// =============================================================================

/// Default batch size for downstream submission
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Largest batch the measurement API accepts
pub const MAX_BATCH_SIZE: usize = 100;

/// Default UTC offset (hours) for timestamps written without a zone (JST)
pub const DEFAULT_TIMEZONE_OFFSET_HOURS: i32 = 9;

/// Valid UTC offset bounds in hours
pub const MIN_TIMEZONE_OFFSET_HOURS: i32 = -12;
pub const MAX_TIMEZONE_OFFSET_HOURS: i32 = 14;

// =============================================================================
// Plausibility Ranges
// =============================================================================

/// Hard plausibility ranges (inclusive min, max) for each numeric field
///
/// Values outside these bounds are physically implausible and reject the row.
pub mod ranges {
    pub const PH: (f64, f64) = (0.0, 14.0);
    pub const TEMPERATURE: (f64, f64) = (-50.0, 100.0);
    pub const CO2_CONCENTRATION: (f64, f64) = (0.0, 10_000.0);
    pub const FLOW_RATE: (f64, f64) = (0.0, 100_000.0);
    pub const IRON: (f64, f64) = (0.0, 1_000.0);
    pub const COPPER: (f64, f64) = (0.0, 1_000.0);
    pub const ZINC: (f64, f64) = (0.0, 1_000.0);
    pub const TURBIDITY: (f64, f64) = (0.0, 1_000.0);
    pub const CONDUCTIVITY: (f64, f64) = (0.0, 50_000.0);
    pub const DISSOLVED_OXYGEN: (f64, f64) = (0.0, 20.0);
    pub const MANGANESE: (f64, f64) = (0.0, 1_000.0);
    pub const LEAD: (f64, f64) = (0.0, 1_000.0);
    pub const CADMIUM: (f64, f64) = (0.0, 1_000.0);
    pub const CHROMIUM: (f64, f64) = (0.0, 1_000.0);
    pub const NITRATE: (f64, f64) = (0.0, 1_000.0);
    pub const PHOSPHATE: (f64, f64) = (0.0, 1_000.0);
    pub const ALKALINITY: (f64, f64) = (0.0, 10_000.0);
    pub const SALINITY: (f64, f64) = (0.0, 100.0);
    pub const TOTAL_ORGANIC_CARBON: (f64, f64) = (0.0, 10_000.0);
    pub const SUSPENDED_SOLIDS: (f64, f64) = (0.0, 100_000.0);

    pub const LATITUDE: (f64, f64) = (-90.0, 90.0);
    pub const LONGITUDE: (f64, f64) = (-180.0, 180.0);
}

/// Warning bands (below, above) for readings that are unusual but possible
pub mod warning_bands {
    pub const PH: (Option<f64>, Option<f64>) = (Some(6.5), Some(8.5));
    pub const TEMPERATURE: (Option<f64>, Option<f64>) = (Some(5.0), Some(35.0));
    pub const CO2_CONCENTRATION: (Option<f64>, Option<f64>) = (None, Some(1_000.0));
    pub const IRON: (Option<f64>, Option<f64>) = (None, Some(10.0));
    pub const COPPER: (Option<f64>, Option<f64>) = (None, Some(1.0));
    pub const ZINC: (Option<f64>, Option<f64>) = (None, Some(5.0));
    pub const NONE: (Option<f64>, Option<f64>) = (None, None);
}

/// Bounding box of Japan used for the coordinate plausibility warning
pub mod japan_bounds {
    pub const MIN_LATITUDE: f64 = 20.0;
    pub const MAX_LATITUDE: f64 = 46.0;
    pub const MIN_LONGITUDE: f64 = 123.0;
    pub const MAX_LONGITUDE: f64 = 146.0;
}

/// Hot-water heuristic: above this temperature an extreme pH is suspicious
pub const HOT_WATER_TEMPERATURE: f64 = 30.0;
pub const HOT_WATER_MIN_PH: f64 = 6.0;
pub const HOT_WATER_MAX_PH: f64 = 9.0;

// =============================================================================
// Template and Reporting
// =============================================================================

/// Header row of the downloadable import template
pub const TEMPLATE_HEADERS: &[&str] = &[
    "timestamp",
    "type",
    "ph",
    "temperature",
    "co2_concentration",
    "flow_rate",
    "iron",
    "copper",
    "zinc",
    "turbidity",
    "conductivity",
    "dissolved_oxygen",
    "latitude",
    "longitude",
    "site_name",
    "notes",
];

/// Illustrative data rows of the import template
pub const TEMPLATE_SAMPLE_ROWS: &[&str] = &[
    "2025-07-28 09:00:00,水質,7.2,25.5,420,150.5,0.5,0.02,0.1,2.5,850,8.2,43.0642,141.9716,札幌処理場,定期測定",
    "2025-07-28 12:00:00,水質,7.0,26.1,415,148.2,0.4,0.01,0.08,2.1,845,8.0,43.0642,141.9716,札幌処理場,",
    "2025-07-28 15:00:00,大気,,28.3,430,,,,,,,,43.0642,141.9716,札幌処理場,大気測定",
];

/// Number of findings listed per stage in the text report
pub const REPORT_FINDINGS_PER_STAGE: usize = 5;

/// Rejected-row percentage above which the template hint is suggested
pub const HIGH_ERROR_RATE_PERCENT: f64 = 50.0;
