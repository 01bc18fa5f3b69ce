//! Per-field validation rule table

use crate::app::models::{ImportField, MeasurementField};
use crate::constants::{ranges, warning_bands};
use std::collections::BTreeMap;

/// Value type a rule expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Timestamp; must not lie in the future
    Date,
    Number,
}

/// Validation rule for one field
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationRule {
    pub kind: RuleKind,
    pub required: bool,

    /// Hard range (inclusive); violations are errors
    pub range: Option<(f64, f64)>,

    /// Readings below this are flagged as unusual
    pub warn_below: Option<f64>,

    /// Readings above this are flagged as unusual
    pub warn_above: Option<f64>,
}

impl ValidationRule {
    pub fn date(required: bool) -> Self {
        Self {
            kind: RuleKind::Date,
            required,
            range: None,
            warn_below: None,
            warn_above: None,
        }
    }

    pub fn number(range: (f64, f64)) -> Self {
        Self {
            kind: RuleKind::Number,
            required: false,
            range: Some(range),
            warn_below: None,
            warn_above: None,
        }
    }

    pub fn with_warning_band(mut self, (below, above): (Option<f64>, Option<f64>)) -> Self {
        self.warn_below = below;
        self.warn_above = above;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Rules keyed by field; fields without a rule are not checked
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    rules: BTreeMap<ImportField, ValidationRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleSet {
    /// Standard rules: required timestamp, plausibility ranges, warning bands
    pub fn standard() -> Self {
        let mut rules = BTreeMap::new();
        rules.insert(ImportField::Timestamp, ValidationRule::date(true));

        for field in MeasurementField::ALL {
            rules.insert(
                ImportField::Value(field),
                ValidationRule::number(field.plausible_range())
                    .with_warning_band(field.warning_band()),
            );
        }

        rules.insert(
            ImportField::Latitude,
            ValidationRule::number(ranges::LATITUDE).with_warning_band(warning_bands::NONE),
        );
        rules.insert(
            ImportField::Longitude,
            ValidationRule::number(ranges::LONGITUDE).with_warning_band(warning_bands::NONE),
        );

        Self { rules }
    }

    /// A rule set with no rules at all
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Add or replace the rule for a field
    pub fn with_rule(mut self, field: ImportField, rule: ValidationRule) -> Self {
        self.rules.insert(field, rule);
        self
    }

    pub fn rule(&self, field: ImportField) -> Option<&ValidationRule> {
        self.rules.get(&field)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
