//! Integration tests for the import pipeline
//!
//! These tests drive the public API end to end: template generation, file
//! import, JSON Lines submission and configuration loading.

use chrono::{TimeZone, Utc};
use mrv_import::app::services::import_processor::write_findings_csv;
use mrv_import::app::services::measurement_sink::{JsonLinesSink, MemorySink, submit_in_chunks};
use mrv_import::{
    CsvParser, ImportConfig, ImportProcessor, MeasurementCreateRequest, MeasurementType,
};
use std::path::Path;
use tempfile::TempDir;

const PROJECT_ID: &str = "proj-001";

fn processor(config: ImportConfig) -> ImportProcessor {
    ImportProcessor::new(config)
        .expect("valid configuration")
        .with_reference_time(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap())
}

async fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    tokio::fs::write(&path, content).await.unwrap();
    path
}

/// The generated template imports cleanly with auto-detected columns
#[tokio::test]
async fn test_template_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "template.csv", &CsvParser::generate_template()).await;

    let result = processor(ImportConfig::default().with_project_id(PROJECT_ID))
        .process_file(&path)
        .await
        .unwrap();

    assert!(result.success, "report:\n{}", result.render_report());
    assert_eq!(result.total_processed, 3);
    assert_eq!(result.total_errors, 0);

    let first = &result.final_measurements[0];
    assert_eq!(first.project_id, PROJECT_ID);
    assert_eq!(first.measurement_type, MeasurementType::WaterQuality);
    assert_eq!(
        first.timestamp,
        Utc.with_ymd_and_hms(2025, 7, 28, 0, 0, 0).unwrap()
    );
    assert_eq!(first.values.ph, Some(7.2));
    assert_eq!(first.location.site_name.as_deref(), Some("札幌処理場"));

    assert_eq!(
        result.final_measurements[2].measurement_type,
        MeasurementType::Atmospheric
    );
}

/// Strict mode fails on one bad row, lenient mode keeps the good one
#[tokio::test]
async fn test_strict_and_lenient_imports() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "scenario.csv",
        "timestamp,ph\n2025-07-28 09:00:00,7.2\n2025-07-28 10:00:00,20\n",
    )
    .await;

    let strict = processor(ImportConfig::default().with_project_id(PROJECT_ID))
        .process_file(&path)
        .await
        .unwrap();
    assert!(!strict.success);
    assert!(strict.final_measurements.is_empty());
    assert_eq!(strict.total_errors, 1);
    assert!(strict.mapping_result.is_none());

    let lenient = processor(
        ImportConfig::default()
            .with_project_id(PROJECT_ID)
            .with_skip_invalid_rows(true),
    )
    .process_file(&path)
    .await
    .unwrap();
    assert!(lenient.success);
    assert_eq!(lenient.total_processed, 1);
    assert_eq!(lenient.total_errors, 1);
    assert_eq!(lenient.final_measurements[0].values.ph, Some(7.2));

    let findings = dir.path().join("findings.csv");
    let written = write_findings_csv(&lenient, &findings).unwrap();
    assert!(written >= 1);
    let exported = std::fs::read_to_string(&findings).unwrap();
    assert!(exported.contains("Value must be between 0 and 14"));
}

/// Mapped requests written as JSON Lines read back unchanged
#[tokio::test]
async fn test_json_lines_submission() {
    let dir = TempDir::new().unwrap();
    let mut csv = String::from("timestamp,ph,temperature\n");
    for hour in 0..24 {
        for minute in [0, 10, 20, 30, 40, 50] {
            csv.push_str(&format!("2025-07-28 {:02}:{:02}:00,7.0,20\n", hour, minute));
        }
    }
    let path = write_file(dir.path(), "day.csv", &csv).await;

    let config = ImportConfig::default()
        .with_project_id(PROJECT_ID)
        .with_batch_size(50);
    let result = processor(config.clone()).process_file(&path).await.unwrap();
    assert!(result.success);
    assert_eq!(result.total_processed, 144);

    let output = dir.path().join("requests.jsonl");
    let mut sink = JsonLinesSink::create(&output).await.unwrap();
    let summary = submit_in_chunks(
        &mut sink,
        &result.final_measurements,
        config.batch_size,
        false,
    )
    .await
    .unwrap();
    assert_eq!(summary.batches, 3);
    assert_eq!(summary.submitted, 144);
    assert_eq!(sink.finish().await.unwrap(), 144);

    let content = tokio::fs::read_to_string(&output).await.unwrap();
    let requests: Vec<MeasurementCreateRequest> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(requests, result.final_measurements);
}

/// Batches never exceed the API limit even when a larger size is requested
#[tokio::test]
async fn test_batches_capped_at_api_limit() {
    let mut csv = String::from("timestamp,ph\n");
    for day in 1..=28 {
        for hour in 0..9 {
            csv.push_str(&format!("2025-06-{:02} {:02}:00:00,7.0\n", day, hour));
        }
    }

    let result = processor(ImportConfig::default().with_project_id(PROJECT_ID))
        .process_content(&csv);
    assert_eq!(result.total_processed, 252);

    let mut sink = MemorySink::new();
    let summary = submit_in_chunks(&mut sink, &result.final_measurements, 500, false)
        .await
        .unwrap();
    assert_eq!(summary.batches, 3);
    assert!(sink.batches().iter().all(|batch| batch.len() <= 100));
}

/// Configuration files drive delimiter, mapping and strictness
#[tokio::test]
async fn test_config_file_drives_import() {
    let dir = TempDir::new().unwrap();
    let config_path = write_file(
        dir.path(),
        "config.toml",
        r#"
project_id = "proj-042"
delimiter = ";"
skip_invalid_rows = true
default_type = "soil"

[column_mapping]
timestamp = "when"
ph = "acidity"
"#,
    )
    .await;
    let csv_path = write_file(
        dir.path(),
        "soil.csv",
        "when;acidity;comment\n2025-05-01 08:00:00;6.8;dry\n2025-05-01 09:00:00;6.9;\n",
    )
    .await;

    let config = ImportConfig::load_layered(Some(&config_path)).unwrap();
    let result = processor(config).process_file(&csv_path).await.unwrap();

    assert!(result.success, "report:\n{}", result.render_report());
    assert_eq!(result.total_processed, 2);
    assert!(
        result
            .final_measurements
            .iter()
            .all(|m| m.project_id == "proj-042" && m.measurement_type == MeasurementType::Soil)
    );
    assert_eq!(result.final_measurements[1].values.ph, Some(6.9));
}

/// Missing files are errors, not failed results
#[tokio::test]
async fn test_missing_file_is_an_error() {
    let result = processor(ImportConfig::default())
        .process_file(Path::new("/nonexistent/measurements.csv"))
        .await;
    assert!(result.is_err());
}
