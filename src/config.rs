//! Configuration management and validation.
//!
//! Provides the import settings shared by the parser, validator, mapper and
//! submission stages, loaded from defaults, an optional TOML file, and
//! command-line overrides (applied by the command layer), in that order.

use crate::app::models::{ColumnMapping, MeasurementType};
use crate::app::services::csv_parser::ParserOptions;
use crate::app::services::mapper::MappingOptions;
use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_DELIMITER, DEFAULT_MAX_PREVIEW_ROWS,
    DEFAULT_TIMEZONE_OFFSET_HOURS, MAX_BATCH_SIZE, MAX_TIMEZONE_OFFSET_HOURS,
    MIN_TIMEZONE_OFFSET_HOURS,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings for one import run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// CSV field delimiter
    pub delimiter: char,

    /// Rows shown by a preview parse
    pub max_preview_rows: usize,

    /// Drop invalid rows and continue instead of failing the whole import
    pub skip_invalid_rows: bool,

    /// Measurement type when the type column is absent or unrecognized
    pub default_type: MeasurementType,

    /// UTC offset (hours) for timestamps written without a zone
    pub timezone_offset_hours: i32,

    /// Requests per submission batch
    pub batch_size: usize,

    /// Project the measurements belong to
    pub project_id: Option<String>,

    pub operator_id: Option<String>,
    pub device_id: Option<String>,

    /// Logical field name -> CSV header; auto-detected when absent
    pub column_mapping: Option<HashMap<String, String>>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            max_preview_rows: DEFAULT_MAX_PREVIEW_ROWS,
            skip_invalid_rows: false,
            default_type: MeasurementType::default(),
            timezone_offset_hours: DEFAULT_TIMEZONE_OFFSET_HOURS,
            batch_size: DEFAULT_BATCH_SIZE,
            project_id: None,
            operator_id: None,
            device_id: None,
            column_mapping: None,
        }
    }
}

impl ImportConfig {
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_max_preview_rows(mut self, max_rows: usize) -> Self {
        self.max_preview_rows = max_rows;
        self
    }

    pub fn with_skip_invalid_rows(mut self, skip: bool) -> Self {
        self.skip_invalid_rows = skip;
        self
    }

    pub fn with_default_type(mut self, default_type: MeasurementType) -> Self {
        self.default_type = default_type;
        self
    }

    pub fn with_timezone_offset_hours(mut self, hours: i32) -> Self {
        self.timezone_offset_hours = hours;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_operator_id(mut self, operator_id: impl Into<String>) -> Self {
        self.operator_id = Some(operator_id.into());
        self
    }

    pub fn with_device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    /// Set one entry of the configured column mapping
    pub fn with_column(mut self, field: impl Into<String>, header: impl Into<String>) -> Self {
        self.column_mapping
            .get_or_insert_with(HashMap::new)
            .insert(field.into(), header.into());
        self
    }

    /// Check value ranges and the configured column mapping
    pub fn validate(&self) -> Result<()> {
        if matches!(self.delimiter, '"' | '\r' | '\n') {
            return Err(Error::configuration(format!(
                "Delimiter {:?} cannot be used",
                self.delimiter
            )));
        }

        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(Error::configuration(format!(
                "Batch size must be between 1 and {}, got {}",
                MAX_BATCH_SIZE, self.batch_size
            )));
        }

        if !(MIN_TIMEZONE_OFFSET_HOURS..=MAX_TIMEZONE_OFFSET_HOURS)
            .contains(&self.timezone_offset_hours)
        {
            return Err(Error::configuration(format!(
                "Timezone offset must be between {} and {} hours, got {}",
                MIN_TIMEZONE_OFFSET_HOURS, MAX_TIMEZONE_OFFSET_HOURS, self.timezone_offset_hours
            )));
        }

        if let Some(project_id) = &self.project_id {
            if project_id.trim().is_empty() {
                return Err(Error::configuration("Project id cannot be empty"));
            }
        }

        self.configured_mapping()?;
        Ok(())
    }

    /// Column mapping from the config, if one is configured
    pub fn configured_mapping(&self) -> Result<Option<ColumnMapping>> {
        self.column_mapping
            .as_ref()
            .map(ColumnMapping::from_names)
            .transpose()
    }

    /// Parser options for full-table parsing
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions::full().with_delimiter(self.delimiter)
    }

    /// Parser options for previews
    pub fn preview_options(&self) -> ParserOptions {
        ParserOptions::default()
            .with_delimiter(self.delimiter)
            .with_max_preview_rows(self.max_preview_rows)
    }

    /// Mapper options derived from this config
    pub fn mapping_options(&self) -> MappingOptions {
        let mut options = MappingOptions::new(self.project_id.clone().unwrap_or_default())
            .with_default_type(self.default_type)
            .with_skip_invalid_rows(self.skip_invalid_rows)
            .with_timezone_offset_hours(self.timezone_offset_hours);
        options.operator_id = self.operator_id.clone();
        options.device_id = self.device_id.clone();
        options
    }

    /// Load a TOML config file; missing keys take their defaults
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io(format!("Failed to read config {}", path.display()), e))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config_file(path.display().to_string(), e.to_string()))?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Per-user config location (`<config dir>/mrv-import/config.toml`)
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mrv-import").join("config.toml"))
    }

    /// Defaults, overlaid by an explicit file or else the per-user file if present
    pub fn load_layered(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match Self::default_config_path() {
            Some(path) if path.is_file() => Self::load_from_file(&path),
            _ => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}
