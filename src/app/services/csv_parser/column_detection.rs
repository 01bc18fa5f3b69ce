//! Header-to-field auto-detection
//!
//! Headers are lowercased and matched against an ordered table of English and
//! Japanese patterns. The first matching field wins for a header, so fields
//! whose patterns overlap (`亜鉛` contains `鉛`) are ordered accordingly.

use crate::app::models::{ColumnMapping, ImportField, MeasurementField};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::debug;

/// Separator that may follow a short abbreviation (`fe_mg`, `do (mg/L)`)
const SEP: &str = r"(?:[\s_(\[\-/.]|$)";

static FIELD_PATTERNS: LazyLock<Vec<(ImportField, Regex)>> = LazyLock::new(|| {
    use ImportField::*;
    use MeasurementField as M;

    let table: Vec<(ImportField, String)> = vec![
        (
            Timestamp,
            r"timestamp|datetime|date|time|measured_at|日時|日付|時刻|測定日|採水日|採取日".to_string(),
        ),
        (
            Type,
            r"type|category|kind|種別|種類|区分".to_string(),
        ),
        // `ph` may run straight into a Japanese suffix (`pH値`) but not into a word
        (Value(M::Ph), r"^p\.?h(?:[^a-z]|$)|ｐｈ|水素イオン".to_string()),
        (Value(M::Temperature), r"temp|温度|水温|気温".to_string()),
        (
            Value(M::Co2Concentration),
            r"co2|co₂|carbon.?dioxide|二酸化炭素".to_string(),
        ),
        (Value(M::FlowRate), r"flow|流量".to_string()),
        (Value(M::Iron), format!(r"iron|^fe{SEP}|鉄")),
        (Value(M::Copper), format!(r"copper|^cu{SEP}|銅")),
        (Value(M::Zinc), format!(r"zinc|^zn{SEP}|亜鉛")),
        (Value(M::Manganese), format!(r"manganese|^mn{SEP}|マンガン")),
        (Value(M::Lead), format!(r"lead|^pb{SEP}|鉛")),
        (Value(M::Cadmium), format!(r"cadmium|^cd{SEP}|カドミウム")),
        (Value(M::Chromium), format!(r"chrom|^cr{SEP}|クロム")),
        (Value(M::Turbidity), r"turbid|\bntu\b|濁度".to_string()),
        (
            Value(M::Conductivity),
            format!(r"conductiv|^ec{SEP}|伝導度|伝導率|導電率"),
        ),
        (
            Value(M::DissolvedOxygen),
            format!(r"dissolved.?oxygen|^do{SEP}|溶存酸素"),
        ),
        (Value(M::Nitrate), format!(r"nitrate|^no3{SEP}|硝酸")),
        (Value(M::Phosphate), format!(r"phosphat|^po4{SEP}|リン酸|りん酸")),
        (Value(M::Alkalinity), r"alkalin|アルカリ度".to_string()),
        (Value(M::Salinity), r"salin|塩分".to_string()),
        (
            Value(M::TotalOrganicCarbon),
            format!(r"total.?organic.?carbon|^toc{SEP}|有機炭素"),
        ),
        (
            Value(M::SuspendedSolids),
            format!(r"suspended|^ss{SEP}|浮遊物質|懸濁物質"),
        ),
        (Latitude, format!(r"latitude|^lat{SEP}|緯度")),
        (Longitude, format!(r"longitude|^lon{SEP}|^lng{SEP}|^long{SEP}|経度")),
        (
            SiteName,
            r"site|station|location|地点|場所|施設".to_string(),
        ),
        (Notes, r"note|memo|remark|comment|備考|メモ".to_string()),
    ];

    table
        .into_iter()
        .map(|(field, pattern)| (field, Regex::new(&pattern).expect("valid regex")))
        .collect()
});

/// Detected field for one header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDetection {
    pub header: String,

    /// `None` when no pattern matched
    pub field: Option<ImportField>,
}

/// Guess the logical field for a single header
pub fn detect_field(header: &str) -> Option<ImportField> {
    let normalized = header.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    FIELD_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(&normalized))
        .map(|(field, _)| *field)
}

/// Guess the logical field for each header, in header order
pub fn detect_columns(headers: &[String]) -> Vec<ColumnDetection> {
    headers
        .iter()
        .map(|header| ColumnDetection {
            header: header.clone(),
            field: detect_field(header),
        })
        .collect()
}

/// Build a column mapping from detected fields
///
/// When several headers detect as the same field, the leftmost one is used.
pub fn detect_column_mapping(headers: &[String]) -> ColumnMapping {
    let mut mapping = ColumnMapping::default();

    for detection in detect_columns(headers) {
        match detection.field {
            Some(field) if !mapping.is_mapped(field) => {
                debug!("Detected column '{}' as {}", detection.header, field);
                mapping.set(field, detection.header);
            }
            Some(field) => {
                debug!(
                    "Ignoring column '{}': {} already mapped",
                    detection.header, field
                );
            }
            None => debug!("No field detected for column '{}'", detection.header),
        }
    }

    mapping
}
