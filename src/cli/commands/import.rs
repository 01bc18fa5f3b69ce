//! Import command implementation
//!
//! Runs the pipeline over one file, reports the outcome, writes the optional
//! exports and, when requested, hands the mapped requests to a JSON Lines sink.

use super::shared::{print_json, setup_logging};
use crate::app::services::import_processor::{
    ImportProcessor, ImportResult, write_findings_csv, write_result_json,
};
use crate::app::services::measurement_sink::{JsonLinesSink, SubmissionSummary, submit_in_chunks};
use crate::cli::args::{ImportArgs, OutputFormat};
use crate::config::ImportConfig;
use crate::{Error, Result};
use colored::*;
use std::path::Path;
use tracing::{debug, info};

pub async fn run_import(args: ImportArgs) -> Result<()> {
    setup_logging(&args.logging)?;
    debug!("Command line arguments: {:?}", args);

    let config = args.resolve_config()?;
    debug!("Resolved configuration: {:?}", config);

    let processor = ImportProcessor::new(config.clone())?;
    let result = processor.process_file(&args.input).await?;

    if let Some(path) = &args.output {
        write_result_json(&result, path)?;
        info!("Wrote import result to {}", path.display());
    }

    if let Some(path) = &args.findings_csv {
        let written = write_findings_csv(&result, path)?;
        info!("Wrote {} findings to {}", written, path.display());
    }

    let submission = match (&args.submit_jsonl, result.success) {
        (Some(path), true) => {
            Some(submit_measurements(&result, &config, path, args.logging.show_progress()).await?)
        }
        (Some(path), false) => {
            info!("Import failed, nothing written to {}", path.display());
            None
        }
        (None, _) => None,
    };

    match args.format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Human if !args.logging.quiet => {
            print_human(&result, submission.as_ref(), args.submit_jsonl.as_deref())
        }
        OutputFormat::Human => {}
    }

    if result.success {
        Ok(())
    } else {
        Err(Error::data_validation(format!(
            "Import of {} failed: {}",
            args.input.display(),
            result.summary.summary()
        )))
    }
}

async fn submit_measurements(
    result: &ImportResult,
    config: &ImportConfig,
    path: &Path,
    show_progress: bool,
) -> Result<SubmissionSummary> {
    let mut sink = JsonLinesSink::create(path).await?;
    let summary = submit_in_chunks(
        &mut sink,
        &result.final_measurements,
        config.batch_size,
        show_progress,
    )
    .await?;
    let written = sink.finish().await?;

    info!(
        "Wrote {} measurements in {} batches to {}",
        written,
        summary.batches,
        path.display()
    );
    Ok(summary)
}

fn print_human(
    result: &ImportResult,
    submission: Option<&SubmissionSummary>,
    target: Option<&Path>,
) {
    println!("\n{}", result.render_report());

    let status = if result.success {
        "Import succeeded".bright_green().bold()
    } else {
        "Import failed".bright_red().bold()
    };
    println!(
        "\n{}: {} measurements ready, {} rows rejected",
        status,
        result.total_processed.to_string().bright_white().bold(),
        result.total_errors.to_string().bright_white().bold()
    );

    if let (Some(summary), Some(path)) = (submission, target) {
        println!(
            "{} {} measurements in {} batches to {}",
            "Submitted".bright_green().bold(),
            summary.submitted,
            summary.batches,
            path.display()
        );
    }

    let suggestions = result.suggest_fixes();
    if !suggestions.is_empty() {
        println!("\n{}", "Suggestions".bright_yellow().bold());
        for suggestion in suggestions {
            println!("  • {}", suggestion);
        }
    }
}
