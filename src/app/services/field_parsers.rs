//! Field parsing utilities for CSV cells
//!
//! This module provides the cell-level parsers shared by the validator and the
//! mapper: the cascading timestamp parser, strict number parsing, and the
//! lenient numeric normalization used when building requests.

use crate::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// Strict ISO-8601 UTC form, e.g. `2025-07-28T09:00:00Z`
static ISO_UTC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}(:\d{2}(\.\d+)?)?Z$").expect("valid regex")
});

/// Explicit local-time patterns, tried in order
///
/// Captures: year, month, day, and optionally hour, minute, second.
static LOCAL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^(\d{4})-(\d{1,2})-(\d{1,2})\s+(\d{1,2}):(\d{2}):(\d{2})$",
        r"^(\d{4})-(\d{1,2})-(\d{1,2})\s+(\d{1,2}):(\d{2})$",
        r"^(\d{4})-(\d{1,2})-(\d{1,2})$",
        r"^(\d{4})/(\d{1,2})/(\d{1,2})\s+(\d{1,2}):(\d{2}):(\d{2})$",
        r"^(\d{4})/(\d{1,2})/(\d{1,2})\s+(\d{1,2}):(\d{2})$",
        r"^(\d{4})/(\d{1,2})/(\d{1,2})$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

/// Zone-less formats tried after the explicit patterns
const FALLBACK_NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const FALLBACK_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y%m%d"];

/// Unit suffixes stripped from numeric cells (`12.5 mg/L`, `25℃`, `80%`)
static UNIT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\sA-Za-zµμΩ°℃%/³²]+$").expect("valid regex"));

/// Build a fixed offset from whole hours, falling back to UTC when out of range
pub fn offset_from_hours(hours: i32) -> FixedOffset {
    hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| {
            warn!("Timezone offset of {} hours is out of range, using UTC", hours);
            Utc.fix()
        })
}

/// Parse a timestamp cell into UTC
///
/// Strategies, first success wins:
/// 1. strict ISO-8601 with `Z`
/// 2. `YYYY-MM-DD[ HH:mm[:ss]]` and `YYYY/MM/DD[ HH:mm[:ss]]`, interpreted at `local_offset`
/// 3. generic forms: RFC 3339 with offset, RFC 2822, ISO without zone, US dates, `YYYYMMDD`
pub fn parse_timestamp(value: &str, local_offset: FixedOffset) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::invalid_timestamp(value));
    }

    if ISO_UTC_PATTERN.is_match(value) {
        if let Some(dt) = parse_iso_utc(value) {
            return Ok(dt);
        }
    }

    for pattern in LOCAL_PATTERNS.iter() {
        if let Some(captures) = pattern.captures(value) {
            let component = |index: usize| -> Option<u32> {
                captures.get(index).map_or(Some(0), |m| m.as_str().parse().ok())
            };
            let year: i32 = match captures[1].parse() {
                Ok(year) => year,
                Err(_) => continue,
            };
            let naive = component(2)
                .zip(component(3))
                .and_then(|(month, day)| NaiveDate::from_ymd_opt(year, month, day))
                .zip(
                    component(4)
                        .zip(component(5))
                        .zip(component(6))
                        .and_then(|((h, m), s)| NaiveTime::from_hms_opt(h, m, s)),
                )
                .map(|(date, time)| date.and_time(time));

            if let Some(dt) = naive.and_then(|naive| local_to_utc(naive, local_offset)) {
                return Ok(dt);
            }
        }
    }

    parse_generic(value, local_offset).ok_or_else(|| Error::invalid_timestamp(value))
}

fn parse_iso_utc(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%MZ")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn parse_generic(value: &str, local_offset: FixedOffset) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in FALLBACK_NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return local_to_utc(naive, local_offset);
        }
    }
    for format in FALLBACK_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return local_to_utc(date.and_time(NaiveTime::MIN), local_offset);
        }
    }
    None
}

fn local_to_utc(naive: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<Utc>> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a cell as a plain finite number, without any cleanup beyond trimming
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// Parse a numeric cell leniently: thousands separators and unit suffixes are removed
pub fn normalize_numeric(value: &str) -> Option<f64> {
    let without_separators = value.replace(',', "");
    let trimmed = without_separators.trim();
    if trimmed.is_empty() {
        return None;
    }

    parse_number(trimmed).or_else(|| parse_number(&UNIT_SUFFIX.replace(trimmed, "")))
}

/// Check a value against an inclusive range
pub fn in_range(value: f64, (min, max): (f64, f64)) -> bool {
    (min..=max).contains(&value)
}
