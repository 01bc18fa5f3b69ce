//! Template command: write the CSV import template

use super::shared::setup_logging;
use crate::app::services::csv_parser::CsvParser;
use crate::cli::args::TemplateArgs;
use crate::{Error, Result};
use colored::*;
use tracing::info;

pub async fn run_template(args: TemplateArgs) -> Result<()> {
    setup_logging(&args.logging)?;

    let template = CsvParser::generate_template();

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, template.as_bytes())
                .await
                .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))?;
            info!("Wrote import template to {}", path.display());
            if !args.logging.quiet {
                println!(
                    "{} {}",
                    "Template written to".bright_green().bold(),
                    path.display()
                );
            }
        }
        None => print!("{}", template),
    }

    Ok(())
}
