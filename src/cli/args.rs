//! Command-line argument definitions for the MRV importer
//!
//! This module defines the CLI interface using the clap derive API. Settings
//! given here override the configuration file, which overrides the defaults.

use crate::app::models::MeasurementType;
use crate::config::ImportConfig;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the MRV measurement importer
///
/// Parses measurement spreadsheets exported as CSV, checks them against
/// physical plausibility rules and turns them into measurement requests.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mrv-import",
    version,
    about = "Import CO2-removal and wastewater measurement CSV files into MRV measurement requests",
    long_about = "Parses measurement spreadsheets exported as CSV (English or Japanese headers), \
                  validates every row against plausibility ranges and cross-field checks, and maps \
                  the valid rows into measurement-creation requests that can be written out as \
                  JSON Lines in API-sized batches."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the full parse, validate and map pipeline over a CSV file
    Import(ImportArgs),
    /// Write the CSV import template
    Template(TemplateArgs),
    /// Show which field each header of a CSV file is detected as
    Detect(DetectArgs),
    /// Show the first rows of a CSV file as parsed
    Preview(PreviewArgs),
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    #[default]
    Human,
    /// JSON on stdout
    Json,
}

/// Logging options shared by every subcommand
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LoggingArgs {
    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl LoggingArgs {
    /// Get log level based on verbosity
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars are hidden in quiet mode
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Settings that shape how a CSV file is read and mapped
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ImportSettingsArgs {
    /// Configuration file path
    ///
    /// TOML file with import settings. When omitted, the per-user config
    /// file is used if it exists.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Configuration file path (TOML)"
    )]
    pub config_file: Option<PathBuf>,

    /// CSV field delimiter
    #[arg(
        short = 'd',
        long = "delimiter",
        value_name = "CHAR",
        help = "CSV field delimiter (default: ',')"
    )]
    pub delimiter: Option<char>,

    /// Explicit column mapping entries
    ///
    /// Repeat for each field, e.g. `--map timestamp=測定日時 --map ph=pH`.
    /// Any entry replaces auto-detection for the whole run.
    #[arg(
        long = "map",
        value_name = "FIELD=HEADER",
        help = "Map a field to a CSV header (repeatable)"
    )]
    pub column_map: Vec<String>,

    /// UTC offset in hours for timestamps without a zone
    #[arg(
        long = "timezone-offset",
        value_name = "HOURS",
        allow_hyphen_values = true,
        help = "UTC offset (hours) for timestamps without a zone (default: 9)"
    )]
    pub timezone_offset_hours: Option<i32>,
}

impl ImportSettingsArgs {
    /// Load the layered configuration and apply these overrides
    pub fn load_config(&self) -> Result<ImportConfig> {
        let mut config = ImportConfig::load_layered(self.config_file.as_deref())?;

        if let Some(delimiter) = self.delimiter {
            config = config.with_delimiter(delimiter);
        }
        if let Some(hours) = self.timezone_offset_hours {
            config = config.with_timezone_offset_hours(hours);
        }
        if !self.column_map.is_empty() {
            config.column_mapping = None;
            for entry in &self.column_map {
                let (field, header) = parse_map_entry(entry)?;
                config = config.with_column(field, header);
            }
        }

        config.validate()?;
        Ok(config)
    }
}

/// Split a `field=header` mapping entry
pub fn parse_map_entry(entry: &str) -> Result<(String, String)> {
    match entry.split_once('=') {
        Some((field, header)) if !field.trim().is_empty() && !header.trim().is_empty() => {
            Ok((field.trim().to_string(), header.trim().to_string()))
        }
        _ => Err(Error::configuration(format!(
            "Column mapping '{}' must look like field=header",
            entry
        ))),
    }
}

/// Arguments for the import command
#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// CSV file to import
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub settings: ImportSettingsArgs,

    /// Project the measurements belong to
    #[arg(
        short = 'p',
        long = "project-id",
        value_name = "ID",
        help = "Project the measurements belong to"
    )]
    pub project_id: Option<String>,

    /// Drop invalid rows instead of failing the import
    #[arg(
        long = "skip-invalid-rows",
        help = "Drop invalid rows and import the rest"
    )]
    pub skip_invalid_rows: bool,

    /// Measurement type for rows without a recognizable type
    #[arg(
        short = 't',
        long = "default-type",
        value_name = "TYPE",
        help = "Default measurement type (water_quality, atmospheric, soil)"
    )]
    pub default_type: Option<MeasurementType>,

    /// Operator recorded on every measurement
    #[arg(long = "operator-id", value_name = "ID")]
    pub operator_id: Option<String>,

    /// Device recorded on every measurement
    #[arg(long = "device-id", value_name = "ID")]
    pub device_id: Option<String>,

    /// Write the full import result as JSON
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Write the full import result as JSON"
    )]
    pub output: Option<PathBuf>,

    /// Write every error and warning as CSV
    #[arg(
        long = "findings-csv",
        value_name = "FILE",
        help = "Write errors and warnings as CSV"
    )]
    pub findings_csv: Option<PathBuf>,

    /// Write the mapped requests as JSON Lines in submission batches
    ///
    /// Requires a project id, from `--project-id` or the config file.
    #[arg(
        long = "submit-jsonl",
        value_name = "FILE",
        help = "Write mapped measurement requests as JSON Lines"
    )]
    pub submit_jsonl: Option<PathBuf>,

    /// Requests per submission batch
    #[arg(
        short = 'b',
        long = "batch-size",
        value_name = "COUNT",
        help = "Requests per submission batch (1-100, default: 100)"
    )]
    pub batch_size: Option<usize>,

    /// Output format for the import report
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub format: OutputFormat,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

impl ImportArgs {
    /// Configuration for this run: layered config plus command-line overrides
    pub fn resolve_config(&self) -> Result<ImportConfig> {
        let mut config = self.settings.load_config()?;

        if let Some(project_id) = &self.project_id {
            config = config.with_project_id(project_id.clone());
        }
        if self.skip_invalid_rows {
            config = config.with_skip_invalid_rows(true);
        }
        if let Some(default_type) = self.default_type {
            config = config.with_default_type(default_type);
        }
        if let Some(operator_id) = &self.operator_id {
            config = config.with_operator_id(operator_id.clone());
        }
        if let Some(device_id) = &self.device_id {
            config = config.with_device_id(device_id.clone());
        }
        if let Some(batch_size) = self.batch_size {
            config = config.with_batch_size(batch_size);
        }

        config.validate()?;

        if self.submit_jsonl.is_some() && config.project_id.is_none() {
            return Err(Error::configuration(
                "--submit-jsonl needs a project id (--project-id or project_id in the config file)",
            ));
        }

        Ok(config)
    }
}

/// Arguments for the template command
#[derive(Debug, Clone, Parser)]
pub struct TemplateArgs {
    /// Write the template to a file instead of stdout
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Write the template to a file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Arguments for the detect command
#[derive(Debug, Clone, Parser)]
pub struct DetectArgs {
    /// CSV file whose headers are inspected
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub settings: ImportSettingsArgs,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub format: OutputFormat,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

/// Arguments for the preview command
#[derive(Debug, Clone, Parser)]
pub struct PreviewArgs {
    /// CSV file to preview
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    #[command(flatten)]
    pub settings: ImportSettingsArgs,

    /// Number of data rows to show
    #[arg(
        short = 'n',
        long = "rows",
        value_name = "COUNT",
        help = "Number of data rows to show (default: 10)"
    )]
    pub rows: Option<usize>,

    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub format: OutputFormat,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let args = Args::try_parse_from(["mrv-import"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn test_import_args_parsing() {
        let args = Args::try_parse_from([
            "mrv-import",
            "import",
            "data.csv",
            "--project-id",
            "proj-001",
            "--skip-invalid-rows",
            "--default-type",
            "atmospheric",
            "--map",
            "timestamp=日時",
            "--map",
            "ph=pH",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();

        let Some(Commands::Import(import)) = args.command else {
            panic!("expected import command");
        };
        assert_eq!(import.input, PathBuf::from("data.csv"));
        assert_eq!(import.project_id.as_deref(), Some("proj-001"));
        assert!(import.skip_invalid_rows);
        assert_eq!(import.default_type, Some(MeasurementType::Atmospheric));
        assert_eq!(import.settings.column_map.len(), 2);
        assert_eq!(import.format, OutputFormat::Json);
        assert_eq!(import.logging.get_log_level(), "debug");
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Args::try_parse_from(["mrv-import", "template", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_levels() {
        let quiet = LoggingArgs {
            verbose: 0,
            quiet: true,
        };
        assert_eq!(quiet.get_log_level(), "error");
        assert!(!quiet.show_progress());

        let default = LoggingArgs::default();
        assert_eq!(default.get_log_level(), "warn");
        assert!(default.show_progress());
    }

    #[test]
    fn test_parse_map_entry() {
        assert_eq!(
            parse_map_entry("timestamp = 測定日時").unwrap(),
            ("timestamp".to_string(), "測定日時".to_string())
        );
        assert!(parse_map_entry("timestamp").is_err());
        assert!(parse_map_entry("=header").is_err());
        assert!(parse_map_entry("field=").is_err());
    }

    #[test]
    fn test_explicit_config_file_must_exist() {
        let settings = ImportSettingsArgs {
            column_map: vec!["timestamp=when".to_string()],
            config_file: Some(PathBuf::from("/nonexistent/config.toml")),
            ..Default::default()
        };
        assert!(settings.load_config().is_err());
    }

    #[test]
    fn test_submit_requires_project_id() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "skip_invalid_rows = false\n").unwrap();

        let args = Args::try_parse_from([
            "mrv-import",
            "import",
            "data.csv",
            "--config",
            config_path.to_str().unwrap(),
            "--submit-jsonl",
            "out.jsonl",
        ])
        .unwrap();
        let Some(Commands::Import(import)) = args.command else {
            panic!("expected import command");
        };
        assert!(matches!(
            import.resolve_config(),
            Err(Error::Configuration { .. })
        ));

        let with_project = ImportArgs {
            project_id: Some("proj-001".to_string()),
            ..import
        };
        let config = with_project.resolve_config().unwrap();
        assert_eq!(config.project_id.as_deref(), Some("proj-001"));
    }
}
