//! Tests for findings CSV and result JSON export

use super::*;
use crate::app::services::import_processor::{
    finding_records, write_findings_csv, write_result_json,
};
use tempfile::TempDir;

#[test]
fn test_finding_records_cover_all_stages() {
    let result = lenient(
        "timestamp,ph\n2025-07-28 09:00:00,6.0\n2025-07-28 10:00:00,20\n2025-07-28 11:00:00,1,2\n",
    );
    let records = finding_records(&result);

    let stages: Vec<&str> = records.iter().map(|r| r.stage).collect();
    assert_eq!(stages, vec!["parsing", "validation", "validation", "mapping"]);

    assert_eq!(records[0].row, 4);
    assert_eq!(records[1].severity, "warning");
    assert_eq!(records[1].kind, "unusual_value");
    assert_eq!(records[2].kind, "out_of_range");
    assert_eq!(records[3].kind, "out_of_range");
    assert_eq!(records[3].column, "ph");
}

#[test]
fn test_write_findings_csv() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("findings.csv");

    let count = write_findings_csv(&lenient(SCENARIO_CSV), &path).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();

    assert_eq!(
        lines.next(),
        Some("stage,row,column,value,severity,kind,message")
    );
    assert_eq!(lines.count(), count);
}

#[test]
fn test_write_result_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("result.json");

    write_result_json(&lenient(SCENARIO_CSV), &path).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["totalProcessed"], 1);
    assert_eq!(json["totalErrors"], 1);
    assert_eq!(json["finalMeasurements"][0]["projectId"], PROJECT_ID);
    assert_eq!(json["columnMapping"]["ph"], "ph");
    assert_eq!(json["summary"]["parsing"]["totalRows"], 2);
    assert!(json["processingTimeMs"].is_u64());
    assert!(json.get("parseError").is_none());
}
