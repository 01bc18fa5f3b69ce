//! Tests for row mapping, timestamps, strict and lenient modes

use super::*;
use crate::app::models::{ImportField, MeasurementField, MeasurementType};
use crate::app::services::mapper::MappingErrorKind;
use chrono::{TimeZone, Utc};

#[test]
fn test_single_row_with_timestamp_only() {
    let result = map_csv("timestamp\n2025-07-28T09:00:00Z\n", MappingOptions::new(PROJECT_ID));

    assert!(result.success);
    assert!(result.errors.is_empty());
    assert_eq!(result.measurements.len(), 1);

    let request = &result.measurements[0].request;
    assert_eq!(request.project_id, PROJECT_ID);
    assert_eq!(
        request.timestamp,
        Utc.with_ymd_and_hms(2025, 7, 28, 9, 0, 0).unwrap()
    );
    assert_eq!(request.measurement_type, MeasurementType::WaterQuality);
    assert_eq!(request.location.coordinates, None);
    assert_eq!(request.values.count(), 0);
    assert_eq!(result.measurements[0].row, 2);
}

#[test]
fn test_local_timestamp_uses_offset() {
    let result = map_csv(
        "timestamp\n2025-07-28 09:00:00\n2025/07/28\n",
        MappingOptions::new(PROJECT_ID),
    );
    let requests = result.requests();

    // Zone-less timestamps default to JST
    assert_eq!(
        requests[0].timestamp,
        Utc.with_ymd_and_hms(2025, 7, 28, 0, 0, 0).unwrap()
    );
    assert_eq!(
        requests[1].timestamp,
        Utc.with_ymd_and_hms(2025, 7, 27, 15, 0, 0).unwrap()
    );

    let result = map_csv(
        "timestamp\n2025-07-28 09:00:00\n",
        MappingOptions::new(PROJECT_ID).with_timezone_offset_hours(0),
    );
    assert_eq!(
        result.requests()[0].timestamp,
        Utc.with_ymd_and_hms(2025, 7, 28, 9, 0, 0).unwrap()
    );
}

#[test]
fn test_full_row() {
    let options = MappingOptions::new(PROJECT_ID)
        .with_operator_id("op-7")
        .with_device_id("dev-3")
        .with_default_type(MeasurementType::Soil);
    let result = map_csv(
        "timestamp,type,ph,temperature,latitude,longitude,site_name,notes\n\
         2025-07-28 09:00:00,大気,7.2,25.5,43.0642,141.9716,札幌処理場,定期測定\n",
        options,
    );

    let request = &result.measurements[0].request;
    assert_eq!(request.measurement_type, MeasurementType::Atmospheric);
    assert_eq!(request.values.ph, Some(7.2));
    assert_eq!(request.values.temperature, Some(25.5));
    let coordinates = request.location.coordinates.unwrap();
    assert_eq!(coordinates.latitude, 43.0642);
    assert_eq!(coordinates.longitude, 141.9716);
    assert_eq!(request.location.site_name.as_deref(), Some("札幌処理場"));
    assert_eq!(request.notes.as_deref(), Some("定期測定"));
    assert_eq!(request.operator_id.as_deref(), Some("op-7"));
    assert_eq!(request.device_id.as_deref(), Some("dev-3"));
}

#[test]
fn test_unrecognized_type_uses_default() {
    let options = MappingOptions::new(PROJECT_ID).with_default_type(MeasurementType::Soil);
    let result = map_csv("timestamp,type\n2025-07-28 09:00:00,sediment\n", options);

    assert_eq!(result.requests()[0].measurement_type, MeasurementType::Soil);
}

#[test]
fn test_missing_timestamp_rejects_row() {
    let result = map_csv(
        "timestamp,ph\n,7.2\ngarbage,7.0\n2025-07-28 09:00:00,7.1\n",
        lenient_options(),
    );

    assert!(result.success);
    assert_eq!(result.measurements.len(), 1);
    assert_eq!(result.measurements[0].row, 4);
    assert_eq!(result.errors.len(), 2);
    assert!(
        result
            .errors
            .iter()
            .all(|e| e.kind == MappingErrorKind::MissingTimestamp)
    );
    assert_eq!(result.errors[1].value, "garbage");
}

#[test]
fn test_strict_mode_aborts_on_first_error() {
    let result = map_csv(
        "timestamp,ph\n2025-07-28 09:00:00,7.2\n2025-07-28 10:00:00,15\n,7\n",
        MappingOptions::new(PROJECT_ID),
    );

    assert!(!result.success);
    assert!(result.measurements.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].row, 3);
}

#[test]
fn test_skip_mode_records_and_continues() {
    let result = map_csv(
        "timestamp,ph\n2025-07-28 09:00:00,7.2\n2025-07-28 10:00:00,15\n2025-07-28 11:00:00,6.9\n",
        lenient_options(),
    );

    assert!(result.success);
    assert_eq!(
        result.measurements.iter().map(|m| m.row).collect::<Vec<_>>(),
        vec![2, 4]
    );
    assert_eq!(result.error_rows().into_iter().collect::<Vec<_>>(), vec![3]);
}

#[test]
fn test_explicit_mapping() {
    let table = parse_all("when,acidity,memo\n2025-07-28 09:00:00,7.4,ok\n");
    let mapping = ColumnMapping::new("when")
        .with(ImportField::Value(MeasurementField::Ph), "acidity")
        .with(ImportField::Notes, "memo");

    let result = Mapper::new(MappingOptions::new(PROJECT_ID)).map(&table, &mapping);
    let request = &result.measurements[0].request;

    assert_eq!(request.values.ph, Some(7.4));
    assert_eq!(request.notes.as_deref(), Some("ok"));
}

#[test]
fn test_request_serializes_to_api_shape() {
    let result = map_csv(
        "timestamp,ph,co2_concentration,latitude,longitude,site_name\n\
         2025-07-28T09:00:00Z,7.2,420,43.0642,141.9716,札幌処理場\n",
        MappingOptions::new(PROJECT_ID),
    );
    let json = serde_json::to_value(&result.measurements[0].request).unwrap();

    assert_eq!(json["projectId"], "proj-001");
    assert_eq!(json["timestamp"], "2025-07-28T09:00:00Z");
    assert_eq!(json["type"], "water_quality");
    assert_eq!(json["location"]["latitude"], 43.0642);
    assert_eq!(json["location"]["siteName"], "札幌処理場");
    assert_eq!(json["values"]["co2Concentration"], 420.0);
    assert!(json["values"].get("iron").is_none());
    assert!(json.get("notes").is_none());
}
