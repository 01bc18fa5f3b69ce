//! Command implementations for the MRV importer CLI
//!
//! Each command is implemented in its own module:
//! - `import`: full pipeline run with report, exports and JSON Lines submission
//! - `template`: CSV import template
//! - `detect`: header to field detection for a file
//! - `preview`: first rows of a file as parsed

pub mod detect;
pub mod import;
pub mod preview;
pub mod shared;
pub mod template;

use crate::cli::args::{Args, Commands};
use anyhow::Context;

/// Dispatch to the subcommand handler
///
/// Library errors are wrapped with the file the command was working on.
pub async fn run(args: Args) -> anyhow::Result<()> {
    match args.command {
        Some(Commands::Import(import_args)) => {
            import::run_import(import_args).await?;
        }
        Some(Commands::Template(template_args)) => {
            template::run_template(template_args)
                .await
                .context("Could not write the import template")?;
        }
        Some(Commands::Detect(detect_args)) => {
            let input = detect_args.input.clone();
            detect::run_detect(detect_args)
                .await
                .with_context(|| format!("Could not detect columns in {}", input.display()))?;
        }
        Some(Commands::Preview(preview_args)) => {
            let input = preview_args.input.clone();
            preview::run_preview(preview_args)
                .await
                .with_context(|| format!("Could not preview {}", input.display()))?;
        }
        None => {}
    }
    Ok(())
}
