//! Test utilities for import processor testing

use chrono::{DateTime, TimeZone, Utc};
use std::io::Write;
use tempfile::NamedTempFile;

use super::{ImportProcessor, ImportResult};
use crate::config::ImportConfig;

// Test modules
mod export_tests;

pub const PROJECT_ID: &str = "proj-001";

/// Two rows at the same time; the second has an out-of-range pH
pub const SCENARIO_CSV: &str = "timestamp,ph\n2025-07-28 09:00:00,7.2\n2025-07-28 09:00:00,20";

pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

pub fn processor(skip_invalid_rows: bool) -> ImportProcessor {
    let config = ImportConfig::default()
        .with_project_id(PROJECT_ID)
        .with_skip_invalid_rows(skip_invalid_rows);
    ImportProcessor::new(config)
        .unwrap()
        .with_reference_time(reference_time())
}

pub fn lenient(content: &str) -> ImportResult {
    processor(true).process_content(content)
}

pub fn strict(content: &str) -> ImportResult {
    processor(false).process_content(content)
}

pub fn create_temp_csv(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}
