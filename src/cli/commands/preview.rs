//! Preview command: show the first rows of a CSV file as parsed

use super::shared::{print_json, setup_logging, truncate_cell};
use crate::Result;
use crate::app::models::ParsedTable;
use crate::app::services::csv_parser::CsvParser;
use crate::cli::args::{OutputFormat, PreviewArgs};
use colored::*;

const PREVIEW_CELL_WIDTH: usize = 14;

pub async fn run_preview(args: PreviewArgs) -> Result<()> {
    setup_logging(&args.logging)?;

    let mut config = args.settings.load_config()?;
    if let Some(rows) = args.rows {
        config = config.with_max_preview_rows(rows);
    }

    let table = CsvParser::new(config.preview_options())
        .parse_file(&args.input)
        .await?;

    match args.format {
        OutputFormat::Json => print_json(&table),
        OutputFormat::Human => {
            print_human(&table);
            Ok(())
        }
    }
}

fn print_human(table: &ParsedTable) {
    println!(
        "\n{} {} of {} rows, {} columns",
        "Preview:".bright_green().bold(),
        table.preview_row_count.to_string().bright_white().bold(),
        table.total_row_count.to_string().bright_white().bold(),
        table.headers.len()
    );

    let header_line: Vec<String> = std::iter::once(format!("{:>5}", "row"))
        .chain(table.headers.iter().map(|h| pad(h)))
        .collect();
    println!("{}", header_line.join(" ").bold());

    for row in &table.rows {
        let cells: Vec<String> = std::iter::once(format!("{:>5}", row.row_number))
            .chain(table.headers.iter().map(|h| pad(row.raw(h).unwrap_or(""))))
            .collect();
        println!("{}", cells.join(" "));
    }

    if !table.row_errors.is_empty() {
        println!("\n{}", "Malformed rows".bright_red().bold());
        for error in &table.row_errors {
            println!("  Row {}: {}", error.row_number, error.message);
        }
    }
}

fn pad(value: &str) -> String {
    format!(
        "{:<width$}",
        truncate_cell(value, PREVIEW_CELL_WIDTH),
        width = PREVIEW_CELL_WIDTH
    )
}
