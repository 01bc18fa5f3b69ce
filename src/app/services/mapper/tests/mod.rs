//! Test utilities for mapper testing

use super::{Mapper, MappingOptions, MappingResult};
use crate::app::models::{ColumnMapping, ParsedTable};
use crate::app::services::csv_parser::{CsvParser, ParserOptions};

mod mapper_tests;

pub const PROJECT_ID: &str = "proj-001";

pub fn parse_all(content: &str) -> ParsedTable {
    CsvParser::new(ParserOptions::full())
        .parse(content)
        .expect("test CSV should parse")
}

pub fn lenient_options() -> MappingOptions {
    MappingOptions::new(PROJECT_ID).with_skip_invalid_rows(true)
}

/// Map `content` with the auto-detected mapping
pub fn map_csv(content: &str, options: MappingOptions) -> MappingResult {
    let table = parse_all(content);
    let mapping = ColumnMapping::auto_detect(&table.headers);
    Mapper::new(options).map(&table, &mapping)
}
