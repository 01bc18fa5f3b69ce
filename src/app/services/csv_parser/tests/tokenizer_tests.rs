//! Tests for quote-aware line splitting

use crate::app::services::csv_parser::tokenizer::{LineError, split_line, split_row};

fn split(line: &str) -> Vec<String> {
    split_line(line, ',').unwrap()
}

#[test]
fn test_plain_fields() {
    assert_eq!(split("a,b,c"), vec!["a", "b", "c"]);
    assert_eq!(split(" a , b ,c "), vec!["a", "b", "c"]);
}

#[test]
fn test_empty_fields() {
    assert_eq!(split(",,"), vec!["", "", ""]);
    assert_eq!(split("a,"), vec!["a", ""]);
    assert_eq!(split(""), vec![""]);
}

#[test]
fn test_quoted_delimiter() {
    assert_eq!(split("\"a,b\",c"), vec!["a,b", "c"]);
}

#[test]
fn test_escaped_quotes() {
    assert_eq!(split("\"say \"\"hi\"\"\",x"), vec!["say \"hi\"", "x"]);
    assert_eq!(split("\"\""), vec![""]);
}

#[test]
fn test_quoted_field_with_outer_whitespace() {
    assert_eq!(split("  \"padded\"  ,x"), vec!["padded", "x"]);
}

#[test]
fn test_unterminated_quote() {
    assert_eq!(split_line("\"open,b", ','), Err(LineError::UnterminatedQuote));
}

#[test]
fn test_split_row_pads_short_rows() {
    let cells = split_row("1", ',', 3).unwrap();
    assert_eq!(cells, vec!["1", "", ""]);
}

#[test]
fn test_split_row_tolerates_blank_surplus() {
    let cells = split_row("1,2, ,", ',', 2).unwrap();
    assert_eq!(cells, vec!["1", "2"]);
}

#[test]
fn test_split_row_rejects_populated_surplus() {
    assert_eq!(
        split_row("1,2,3", ',', 2),
        Err(LineError::TooManyColumns {
            found: 3,
            expected: 2
        })
    );
}

#[test]
fn test_tab_delimiter() {
    assert_eq!(split_line("a\tb,c", '\t').unwrap(), vec!["a", "b,c"]);
}
