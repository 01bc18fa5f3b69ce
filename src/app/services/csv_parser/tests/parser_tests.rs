//! Tests for the main CSV parser functionality

use super::*;
use crate::app::models::{ColumnMapping, ImportField};
use crate::app::services::csv_parser::ParseError;

#[test]
fn test_parse_simple_table() {
    let table = parse_preview(SIMPLE_CSV);

    assert_eq!(table.headers, vec!["timestamp", "ph", "temperature"]);
    assert_eq!(table.total_row_count, 2);
    assert_eq!(table.preview_row_count, 2);
    assert!(table.row_errors.is_empty());

    assert_eq!(table.rows[0].row_number, 2);
    assert_eq!(table.rows[1].row_number, 3);
    assert_eq!(table.rows[0].raw("ph"), Some("7.2"));
    assert_eq!(table.rows[1].raw("temperature"), Some("26.1"));
}

#[test]
fn test_empty_input() {
    let parser = CsvParser::default();

    assert_eq!(parser.parse(""), Err(ParseError::EmptyInput));
    assert_eq!(parser.parse("\n   \n\r\n"), Err(ParseError::EmptyInput));
}

#[test]
fn test_empty_header() {
    let result = CsvParser::default().parse(" , ,\n1,2,3\n");
    assert_eq!(result, Err(ParseError::EmptyHeader));
}

#[test]
fn test_duplicate_headers_case_insensitive() {
    let result = CsvParser::default().parse("Timestamp,pH, timestamp \n2025-07-28,7,x\n");

    match result {
        Err(ParseError::DuplicateHeader { names }) => {
            assert_eq!(names, vec!["Timestamp".to_string()]);
        }
        other => panic!("expected DuplicateHeader, got {:?}", other),
    }
}

#[test]
fn test_malformed_header() {
    let result = CsvParser::default().parse("\"timestamp,ph\n1,2\n");
    assert!(matches!(result, Err(ParseError::MalformedHeader { .. })));
}

#[test]
fn test_header_only() {
    let table = parse_preview("timestamp,ph\n");

    assert_eq!(table.headers.len(), 2);
    assert_eq!(table.total_row_count, 0);
    assert_eq!(table.preview_row_count, 0);
    assert!(table.rows.is_empty());
}

#[test]
fn test_quoted_fields() {
    let content = "timestamp,notes,site_name\n\
2025-07-28 09:00:00,\"Hello, world\",\"He said \"\"hi\"\"\"\n";
    let table = parse_preview(content);

    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].raw("notes"), Some("Hello, world"));
    assert_eq!(table.rows[0].raw("site_name"), Some("He said \"hi\""));
}

#[test]
fn test_headers_and_values_trimmed() {
    let table = parse_preview(" timestamp , ph \n 2025-07-28 09:00:00 ,  7.2 \n");

    assert_eq!(table.headers, vec!["timestamp", "ph"]);
    assert_eq!(table.rows[0].raw("ph"), Some("7.2"));
}

#[test]
fn test_quoted_headers_trimmed_inside_quotes() {
    let table = parse_preview("\" timestamp \",\" ph\"\n2025-07-28 09:00:00,7.2\n");

    assert_eq!(table.headers, vec!["timestamp", "ph"]);
    assert_eq!(table.rows[0].raw("timestamp"), Some("2025-07-28 09:00:00"));

    let mut mapping = ColumnMapping::default();
    mapping.set(ImportField::Timestamp, "timestamp".to_string());
    assert!(mapping.check_headers(&table.headers).is_empty());
}

#[test]
fn test_bom_stripped() {
    let table = parse_preview("\u{feff}timestamp,ph\n2025-07-28 09:00:00,7.2\n");

    assert_eq!(table.headers[0], "timestamp");
    assert_eq!(table.rows[0].raw("timestamp"), Some("2025-07-28 09:00:00"));
}

#[test]
fn test_blank_lines_and_crlf() {
    let table = parse_preview("a,b\r\n\r\n1,2\r\n   \r\n3,4\r\n");

    assert_eq!(table.total_row_count, 2);
    assert_eq!(table.rows[0].row_number, 2);
    assert_eq!(table.rows[1].row_number, 3);
    assert_eq!(table.rows[1].raw("b"), Some("4"));
}

#[test]
fn test_short_rows_padded() {
    let table = parse_preview("a,b,c\n1\n");

    assert_eq!(table.rows[0].raw("a"), Some("1"));
    assert_eq!(table.rows[0].raw("b"), Some(""));
    assert_eq!(table.rows[0].value("c"), None);
}

#[test]
fn test_trailing_empty_cells_tolerated() {
    let table = parse_preview("a,b\n1,2,,\n");

    assert!(table.row_errors.is_empty());
    assert_eq!(table.rows[0].values.len(), 2);
}

#[test]
fn test_blank_header_cell_keeps_alignment() {
    let table = parse_preview("a,,c\n1,2,3\n");

    assert_eq!(table.headers, vec!["a", "c"]);
    assert_eq!(table.rows[0].values.len(), 2);
    assert_eq!(table.rows[0].raw("a"), Some("1"));
    assert_eq!(table.rows[0].raw("c"), Some("3"));
}

#[test]
fn test_isolated_row_errors_reported() {
    let table = parse_preview("a,b\n1,2,3\n4,5\n6,7\n");

    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.total_row_count, 3);
    assert_eq!(table.preview_row_count, 2);
    assert_eq!(table.row_errors.len(), 1);
    assert_eq!(table.row_errors[0].row_number, 2);
    assert!(table.row_errors[0].message.contains("3 columns"));
}

#[test]
fn test_half_failed_rows_still_parse() {
    let content = "a,b\n1,2\n\"bad,3\n4,5\n\"bad,6\n";
    let table = parse_preview(content);

    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.row_errors.len(), 2);
}

#[test]
fn test_too_many_parse_errors() {
    let content = "a,b\n1,2\n\"x,1\n\"y,2\n\"z,3\n\"w,4\n5,6\n";
    let result = CsvParser::default().parse(content);

    match result {
        Err(ParseError::TooManyParseErrors {
            failed,
            attempted,
            samples,
        }) => {
            assert_eq!(failed, 4);
            assert_eq!(attempted, 6);
            assert_eq!(samples.len(), 3);
            assert!(samples[0].starts_with("Row 3:"));
            assert!(samples[2].starts_with("Row 5:"));
        }
        other => panic!("expected TooManyParseErrors, got {:?}", other),
    }
}

#[test]
fn test_preview_row_limit() {
    let content = numbered_csv(25);
    let table = parse_preview(&content);

    assert_eq!(table.total_row_count, 25);
    assert_eq!(table.preview_row_count, 10);
    assert_eq!(table.rows.len(), 10);
    assert_eq!(table.rows[9].row_number, 11);
}

#[test]
fn test_custom_preview_limit_and_full_mode() {
    let content = numbered_csv(25);

    let table = CsvParser::new(ParserOptions::default().with_max_preview_rows(3))
        .parse(&content)
        .unwrap();
    assert_eq!(table.rows.len(), 3);

    let table = parse_full(&content);
    assert_eq!(table.rows.len(), 25);
    assert_eq!(table.preview_row_count, 25);
}

#[test]
fn test_preview_ignores_rows_beyond_limit() {
    // Malformed rows past the preview window do not count toward the threshold
    let mut content = numbered_csv(10);
    for _ in 0..20 {
        content.push_str("\"broken,row\n");
    }

    let table = parse_preview(&content);
    assert_eq!(table.rows.len(), 10);
    assert!(table.row_errors.is_empty());
    assert_eq!(table.total_row_count, 30);
}

#[test]
fn test_semicolon_delimiter() {
    let parser = CsvParser::new(ParserOptions::default().with_delimiter(';'));
    let table = parser.parse("timestamp;notes\n2025-07-28;a,b\n").unwrap();

    assert_eq!(table.headers, vec!["timestamp", "notes"]);
    assert_eq!(table.rows[0].raw("notes"), Some("a,b"));
}

#[tokio::test]
async fn test_parse_file() {
    let file = create_temp_csv(SIMPLE_CSV.as_bytes());
    let table = CsvParser::default().parse_file(file.path()).await.unwrap();

    assert_eq!(table.total_row_count, 2);
}

#[tokio::test]
async fn test_parse_file_rejects_invalid_utf8() {
    let file = create_temp_csv(&[b't', b's', b'\n', 0xff, 0xfe, b'\n']);
    let result = CsvParser::default().parse_file(file.path()).await;

    assert!(matches!(result, Err(ParseError::Unreadable { .. })));
}

#[tokio::test]
async fn test_parse_missing_file() {
    let result = CsvParser::default()
        .parse_file(std::path::Path::new("/nonexistent/measurements.csv"))
        .await;

    match result {
        Err(e @ ParseError::Unreadable { .. }) => assert_eq!(e.code(), "unreadable"),
        other => panic!("expected Unreadable, got {:?}", other),
    }
}
