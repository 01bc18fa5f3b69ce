//! Measurement type keywords

use crate::app::models::MeasurementType;

/// Keywords per type, checked in order against the lowercased cell
const TYPE_KEYWORDS: &[(MeasurementType, &[&str])] = &[
    (MeasurementType::WaterQuality, &["水質", "water"]),
    (MeasurementType::Atmospheric, &["大気", "atmospher", "air"]),
    (MeasurementType::Soil, &["土壌", "soil"]),
];

/// Resolve a type cell, falling back to `default` when absent or unmatched
pub fn detect_type(value: Option<&str>, default: MeasurementType) -> MeasurementType {
    let Some(value) = value else {
        return default;
    };
    let value = value.to_lowercase();

    TYPE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| value.contains(keyword)))
        .map_or(default, |(measurement_type, _)| *measurement_type)
}
