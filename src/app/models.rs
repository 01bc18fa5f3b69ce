//! Data models for measurement imports
//!
//! This module contains the core data structures shared by the import stages:
//! the closed set of importable fields, the parsed CSV table, validation
//! findings, and the measurement-creation request handed to the API client.

use crate::app::services::csv_parser::detect_column_mapping;
use crate::constants::{ranges, warning_bands};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Measurement Fields
// =============================================================================

/// Numeric measurement fields a request can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeasurementField {
    Ph,
    Temperature,
    Co2Concentration,
    FlowRate,
    Iron,
    Copper,
    Zinc,
    Turbidity,
    Conductivity,
    DissolvedOxygen,
    Manganese,
    Lead,
    Cadmium,
    Chromium,
    Nitrate,
    Phosphate,
    Alkalinity,
    Salinity,
    TotalOrganicCarbon,
    SuspendedSolids,
}

impl MeasurementField {
    /// Every numeric field, in request order
    pub const ALL: [MeasurementField; 20] = [
        MeasurementField::Ph,
        MeasurementField::Temperature,
        MeasurementField::Co2Concentration,
        MeasurementField::FlowRate,
        MeasurementField::Iron,
        MeasurementField::Copper,
        MeasurementField::Zinc,
        MeasurementField::Turbidity,
        MeasurementField::Conductivity,
        MeasurementField::DissolvedOxygen,
        MeasurementField::Manganese,
        MeasurementField::Lead,
        MeasurementField::Cadmium,
        MeasurementField::Chromium,
        MeasurementField::Nitrate,
        MeasurementField::Phosphate,
        MeasurementField::Alkalinity,
        MeasurementField::Salinity,
        MeasurementField::TotalOrganicCarbon,
        MeasurementField::SuspendedSolids,
    ];

    /// API field name (camelCase)
    pub fn name(self) -> &'static str {
        match self {
            MeasurementField::Ph => "ph",
            MeasurementField::Temperature => "temperature",
            MeasurementField::Co2Concentration => "co2Concentration",
            MeasurementField::FlowRate => "flowRate",
            MeasurementField::Iron => "iron",
            MeasurementField::Copper => "copper",
            MeasurementField::Zinc => "zinc",
            MeasurementField::Turbidity => "turbidity",
            MeasurementField::Conductivity => "conductivity",
            MeasurementField::DissolvedOxygen => "dissolvedOxygen",
            MeasurementField::Manganese => "manganese",
            MeasurementField::Lead => "lead",
            MeasurementField::Cadmium => "cadmium",
            MeasurementField::Chromium => "chromium",
            MeasurementField::Nitrate => "nitrate",
            MeasurementField::Phosphate => "phosphate",
            MeasurementField::Alkalinity => "alkalinity",
            MeasurementField::Salinity => "salinity",
            MeasurementField::TotalOrganicCarbon => "totalOrganicCarbon",
            MeasurementField::SuspendedSolids => "suspendedSolids",
        }
    }

    /// Hard plausibility range (inclusive)
    pub fn plausible_range(self) -> (f64, f64) {
        match self {
            MeasurementField::Ph => ranges::PH,
            MeasurementField::Temperature => ranges::TEMPERATURE,
            MeasurementField::Co2Concentration => ranges::CO2_CONCENTRATION,
            MeasurementField::FlowRate => ranges::FLOW_RATE,
            MeasurementField::Iron => ranges::IRON,
            MeasurementField::Copper => ranges::COPPER,
            MeasurementField::Zinc => ranges::ZINC,
            MeasurementField::Turbidity => ranges::TURBIDITY,
            MeasurementField::Conductivity => ranges::CONDUCTIVITY,
            MeasurementField::DissolvedOxygen => ranges::DISSOLVED_OXYGEN,
            MeasurementField::Manganese => ranges::MANGANESE,
            MeasurementField::Lead => ranges::LEAD,
            MeasurementField::Cadmium => ranges::CADMIUM,
            MeasurementField::Chromium => ranges::CHROMIUM,
            MeasurementField::Nitrate => ranges::NITRATE,
            MeasurementField::Phosphate => ranges::PHOSPHATE,
            MeasurementField::Alkalinity => ranges::ALKALINITY,
            MeasurementField::Salinity => ranges::SALINITY,
            MeasurementField::TotalOrganicCarbon => ranges::TOTAL_ORGANIC_CARBON,
            MeasurementField::SuspendedSolids => ranges::SUSPENDED_SOLIDS,
        }
    }

    /// Warning band as (warn below, warn above)
    pub fn warning_band(self) -> (Option<f64>, Option<f64>) {
        match self {
            MeasurementField::Ph => warning_bands::PH,
            MeasurementField::Temperature => warning_bands::TEMPERATURE,
            MeasurementField::Co2Concentration => warning_bands::CO2_CONCENTRATION,
            MeasurementField::Iron => warning_bands::IRON,
            MeasurementField::Copper => warning_bands::COPPER,
            MeasurementField::Zinc => warning_bands::ZINC,
            _ => warning_bands::NONE,
        }
    }
}

impl fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Import Fields
// =============================================================================

/// Logical field a CSV column can be mapped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImportField {
    Timestamp,
    Type,
    Value(MeasurementField),
    Latitude,
    Longitude,
    SiteName,
    Notes,
}

impl ImportField {
    /// All mappable fields, timestamp first
    pub fn all() -> impl Iterator<Item = ImportField> {
        [ImportField::Timestamp, ImportField::Type]
            .into_iter()
            .chain(MeasurementField::ALL.into_iter().map(ImportField::Value))
            .chain([
                ImportField::Latitude,
                ImportField::Longitude,
                ImportField::SiteName,
                ImportField::Notes,
            ])
    }

    /// Field name as used in column mappings (camelCase)
    pub fn name(self) -> &'static str {
        match self {
            ImportField::Timestamp => "timestamp",
            ImportField::Type => "type",
            ImportField::Value(field) => field.name(),
            ImportField::Latitude => "latitude",
            ImportField::Longitude => "longitude",
            ImportField::SiteName => "siteName",
            ImportField::Notes => "notes",
        }
    }

    /// Measurement field behind this import field, if numeric
    pub fn measurement(self) -> Option<MeasurementField> {
        match self {
            ImportField::Value(field) => Some(field),
            _ => None,
        }
    }
}

impl fmt::Display for ImportField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImportField {
    type Err = Error;

    /// Accepts camelCase (`co2Concentration`) or snake_case (`co2_concentration`)
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().replace('_', "").to_lowercase();
        ImportField::all()
            .find(|field| field.name().to_lowercase() == wanted)
            .ok_or_else(|| Error::configuration(format!("Unknown import field '{}'", s.trim())))
    }
}

impl Serialize for ImportField {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ImportField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Kind of measurement a record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementType {
    #[default]
    WaterQuality,
    Atmospheric,
    Soil,
}

impl MeasurementType {
    pub fn as_str(self) -> &'static str {
        match self {
            MeasurementType::WaterQuality => "water_quality",
            MeasurementType::Atmospheric => "atmospheric",
            MeasurementType::Soil => "soil",
        }
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasurementType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "water_quality" | "waterquality" => Ok(MeasurementType::WaterQuality),
            "atmospheric" => Ok(MeasurementType::Atmospheric),
            "soil" => Ok(MeasurementType::Soil),
            other => Err(Error::configuration(format!(
                "Unknown measurement type '{}' (expected water_quality, atmospheric or soil)",
                other
            ))),
        }
    }
}

// =============================================================================
// Column Mapping
// =============================================================================

/// Association from logical fields to CSV header names for one import run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    columns: BTreeMap<ImportField, String>,
}

impl ColumnMapping {
    /// Create a mapping with the required timestamp column
    pub fn new(timestamp_header: impl Into<String>) -> Self {
        let mut mapping = Self::default();
        mapping.set(ImportField::Timestamp, timestamp_header);
        mapping
    }

    /// Add a field mapping (builder style)
    pub fn with(mut self, field: ImportField, header: impl Into<String>) -> Self {
        self.set(field, header);
        self
    }

    /// Map a field to a header, replacing any previous header
    pub fn set(&mut self, field: ImportField, header: impl Into<String>) {
        self.columns.insert(field, header.into());
    }

    /// Build a mapping from field-name keys, as found in config files
    pub fn from_names(names: &HashMap<String, String>) -> Result<Self> {
        let mut mapping = Self::default();
        for (name, header) in names {
            let header = header.trim();
            if header.is_empty() {
                continue;
            }
            mapping.set(name.parse::<ImportField>()?, header);
        }
        Ok(mapping)
    }

    /// Header mapped to a field
    pub fn get(&self, field: ImportField) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    pub fn is_mapped(&self, field: ImportField) -> bool {
        self.columns.contains_key(&field)
    }

    /// Header of the timestamp column
    pub fn timestamp_column(&self) -> Option<&str> {
        self.get(ImportField::Timestamp)
    }

    /// Iterate over (field, header) pairs in field order
    pub fn iter(&self) -> impl Iterator<Item = (ImportField, &str)> {
        self.columns
            .iter()
            .map(|(field, header)| (*field, header.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Build a mapping from header auto-detection
    pub fn auto_detect(headers: &[String]) -> Self {
        detect_column_mapping(headers)
    }

    /// Problems that make this mapping unusable against the given headers
    pub fn check_headers(&self, headers: &[String]) -> Vec<String> {
        let mut problems = Vec::new();
        if self.timestamp_column().is_none() {
            problems.push("No column is mapped to the required timestamp field".to_string());
        }
        for (field, header) in self.iter() {
            if !headers.iter().any(|h| h == header) {
                problems.push(format!(
                    "Column '{}' mapped to {} is not present in the file",
                    header, field
                ));
            }
        }
        problems
    }
}

// =============================================================================
// Parsed CSV Table
// =============================================================================

/// Result of parsing CSV text: headers plus materialized data rows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTable {
    /// Header names in file order (unique after case-insensitive normalization)
    pub headers: Vec<String>,

    /// Successfully parsed data rows in file order
    pub rows: Vec<ParsedRow>,

    /// Number of non-blank data lines in the input
    pub total_row_count: usize,

    /// Number of rows actually materialized into `rows`
    pub preview_row_count: usize,

    /// Rows that could not be parsed and were dropped
    pub row_errors: Vec<RowParseError>,
}

/// One data row keyed by header name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedRow {
    /// 1-based row number; the header is row 1
    pub row_number: usize,

    pub values: HashMap<String, String>,
}

impl ParsedRow {
    /// Raw cell value for a header
    pub fn raw(&self, header: &str) -> Option<&str> {
        self.values.get(header).map(String::as_str)
    }

    /// Trimmed cell value for a header, `None` when absent or blank
    pub fn value(&self, header: &str) -> Option<&str> {
        self.raw(header).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Trimmed value of the column mapped to a field
    pub fn field_value(&self, mapping: &ColumnMapping, field: ImportField) -> Option<&str> {
        mapping.get(field).and_then(|header| self.value(header))
    }
}

/// A data row that failed to parse
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowParseError {
    pub row_number: usize,
    pub message: String,
}

// =============================================================================
// Validation Findings
// =============================================================================

/// Whether a finding blocks the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// What a finding is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Required value missing
    Required,
    /// Value is not a number
    InvalidNumber,
    /// Value is not a recognizable date
    InvalidDate,
    /// Timestamp lies in the future
    FutureDate,
    /// Value outside its hard plausibility range
    OutOfRange,
    /// Value inside the hard range but outside the usual band
    UnusualValue,
    /// Only one of latitude/longitude present
    CoordinatePairing,
    /// Coordinates outside the expected region
    OutsideRegion,
    /// Combination of values that is physically unlikely
    Implausible,
    /// Same timestamp and location as an earlier row
    Duplicate,
}

/// A single validation result for one cell or row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationFinding {
    /// 1-based row number (header row = 1)
    pub row: usize,

    /// CSV column (or field pair) the finding refers to
    pub column: String,

    /// Offending raw value
    pub value: String,

    /// Human-readable description
    pub message: String,

    pub severity: Severity,

    pub kind: FindingKind,

    /// Logical field, when the finding concerns a single mapped field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<ImportField>,
}

impl ValidationFinding {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}, {}: {}", self.row, self.column, self.message)?;
        if !self.value.is_empty() {
            write!(f, " (value: '{}')", self.value)?;
        }
        Ok(())
    }
}

// =============================================================================
// Measurement Create Request
// =============================================================================

/// Paired geographic coordinates in WGS84 decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Where a measurement was taken
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(flatten)]
    pub coordinates: Option<Coordinates>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
}

/// Optional numeric readings of a measurement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementValues {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co2_concentration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iron: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copper: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zinc: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turbidity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conductivity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dissolved_oxygen: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manganese: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cadmium: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chromium: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nitrate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phosphate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alkalinity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salinity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_organic_carbon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspended_solids: Option<f64>,
}

impl MeasurementValues {
    fn slot(&mut self, field: MeasurementField) -> &mut Option<f64> {
        match field {
            MeasurementField::Ph => &mut self.ph,
            MeasurementField::Temperature => &mut self.temperature,
            MeasurementField::Co2Concentration => &mut self.co2_concentration,
            MeasurementField::FlowRate => &mut self.flow_rate,
            MeasurementField::Iron => &mut self.iron,
            MeasurementField::Copper => &mut self.copper,
            MeasurementField::Zinc => &mut self.zinc,
            MeasurementField::Turbidity => &mut self.turbidity,
            MeasurementField::Conductivity => &mut self.conductivity,
            MeasurementField::DissolvedOxygen => &mut self.dissolved_oxygen,
            MeasurementField::Manganese => &mut self.manganese,
            MeasurementField::Lead => &mut self.lead,
            MeasurementField::Cadmium => &mut self.cadmium,
            MeasurementField::Chromium => &mut self.chromium,
            MeasurementField::Nitrate => &mut self.nitrate,
            MeasurementField::Phosphate => &mut self.phosphate,
            MeasurementField::Alkalinity => &mut self.alkalinity,
            MeasurementField::Salinity => &mut self.salinity,
            MeasurementField::TotalOrganicCarbon => &mut self.total_organic_carbon,
            MeasurementField::SuspendedSolids => &mut self.suspended_solids,
        }
    }

    /// Read a value by field
    pub fn get(&self, field: MeasurementField) -> Option<f64> {
        match field {
            MeasurementField::Ph => self.ph,
            MeasurementField::Temperature => self.temperature,
            MeasurementField::Co2Concentration => self.co2_concentration,
            MeasurementField::FlowRate => self.flow_rate,
            MeasurementField::Iron => self.iron,
            MeasurementField::Copper => self.copper,
            MeasurementField::Zinc => self.zinc,
            MeasurementField::Turbidity => self.turbidity,
            MeasurementField::Conductivity => self.conductivity,
            MeasurementField::DissolvedOxygen => self.dissolved_oxygen,
            MeasurementField::Manganese => self.manganese,
            MeasurementField::Lead => self.lead,
            MeasurementField::Cadmium => self.cadmium,
            MeasurementField::Chromium => self.chromium,
            MeasurementField::Nitrate => self.nitrate,
            MeasurementField::Phosphate => self.phosphate,
            MeasurementField::Alkalinity => self.alkalinity,
            MeasurementField::Salinity => self.salinity,
            MeasurementField::TotalOrganicCarbon => self.total_organic_carbon,
            MeasurementField::SuspendedSolids => self.suspended_solids,
        }
    }

    /// Store a value by field
    pub fn set(&mut self, field: MeasurementField, value: f64) {
        *self.slot(field) = Some(value);
    }

    /// Number of values present
    pub fn count(&self) -> usize {
        MeasurementField::ALL
            .iter()
            .filter(|field| self.get(**field).is_some())
            .count()
    }
}

/// Measurement-creation request accepted by the measurement API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementCreateRequest {
    pub project_id: String,

    /// Measurement time in UTC (RFC 3339 on the wire)
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "type")]
    pub measurement_type: MeasurementType,

    pub location: Location,

    pub values: MeasurementValues,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}
