//! Detect command: show how each header of a CSV file would be mapped

use super::shared::{print_json, setup_logging};
use crate::Result;
use crate::app::models::ColumnMapping;
use crate::app::services::csv_parser::{ColumnDetection, CsvParser};
use crate::cli::args::{DetectArgs, OutputFormat};
use colored::*;
use serde::Serialize;
use tracing::info;

/// Detection outcome for one file
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectReport {
    detections: Vec<ColumnDetection>,
    mapping: ColumnMapping,
    /// True when the mapping came from the config file or `--map`
    explicit: bool,
    problems: Vec<String>,
}

pub async fn run_detect(args: DetectArgs) -> Result<()> {
    setup_logging(&args.logging)?;

    let config = args.settings.load_config()?;
    let table = CsvParser::new(config.preview_options())
        .parse_file(&args.input)
        .await?;
    info!(
        "Detecting fields for {} headers in {}",
        table.headers.len(),
        args.input.display()
    );

    let configured = config.configured_mapping()?;
    let explicit = configured.is_some();
    let mapping = configured.unwrap_or_else(|| ColumnMapping::auto_detect(&table.headers));

    let report = DetectReport {
        detections: CsvParser::detect_columns(&table.headers),
        problems: mapping.check_headers(&table.headers),
        mapping,
        explicit,
    };

    match args.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Human => {
            print_human(&report);
            Ok(())
        }
    }
}

fn print_human(report: &DetectReport) {
    println!("\n{}", "Detected columns".bright_green().bold());
    for detection in &report.detections {
        match detection.field {
            Some(field) => {
                let used = report.mapping.get(field) == Some(detection.header.as_str());
                let marker = if used { "✓".green() } else { "·".dimmed() };
                println!(
                    "  {} {:<24} -> {}",
                    marker,
                    detection.header,
                    field.to_string().bright_white().bold()
                );
            }
            None => println!(
                "  {} {:<24} -> {}",
                "?".yellow(),
                detection.header,
                "(not recognized)".dimmed()
            ),
        }
    }

    if report.explicit {
        println!("\n{}", "Configured mapping".bright_green().bold());
        for (field, header) in report.mapping.iter() {
            println!("  {:<20} <- \"{}\"", field, header);
        }
    }

    if report.problems.is_empty() {
        println!("\n{}", "Mapping is usable".bright_green());
    } else {
        println!("\n{}", "Mapping problems".bright_red().bold());
        for problem in &report.problems {
            println!("  • {}", problem);
        }
    }
}
