//! Text normalization applied before tokenization.
//!
//! Two independent passes: date-shaped substrings are rewritten to ISO
//! `YYYY-MM-DD`, then `<number><unit>` expressions are rewritten to meters.
//! Dates run first so the unit scan cannot consume date digits. Candidates
//! that fail to parse are left untouched; normalization never errors.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use serde::Serialize;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d{4}-\d{2}-\d{2}\b|\b\d{1,2}/\d{1,2}/\d{2,4}\b|\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s+\d{1,2}(?:,\s*\d{4})?\b",
    )
    .unwrap()
});

static UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<val>\d+(?:\.\d+)?)\s*(?P<unit>kilometers?|km|meters?|m|centimeters?|cm|millimeters?|mm|miles?|mi|feet|foot|ft)\b",
    )
    .unwrap()
});

/// One applied date rewrite, reported for observability.
#[derive(Debug, Clone, Serialize)]
pub struct DateConversion {
    pub raw: String,
    pub start: usize,
    pub end: usize,
    pub normalized: String,
}

/// One applied unit rewrite.
#[derive(Debug, Clone, Serialize)]
pub struct UnitConversion {
    pub raw: String,
    pub start: usize,
    pub end: usize,
    pub value: f64,
    pub unit: String,
    pub meters: f64,
}

/// Conversion factor to meters for a recognized unit token.
fn unit_factor(unit: &str) -> Option<f64> {
    match unit {
        "km" | "kilometer" | "kilometers" => Some(1_000.0),
        "m" | "meter" | "meters" => Some(1.0),
        "cm" | "centimeter" | "centimeters" => Some(0.01),
        "mm" | "millimeter" | "millimeters" => Some(0.001),
        "mi" | "mile" | "miles" => Some(1_609.34),
        "ft" | "foot" | "feet" => Some(0.3048),
        _ => None,
    }
}

/// Parse one date-shaped candidate. Month-name forms with no year default
/// to the current UTC year.
fn parse_date_candidate(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if trimmed.contains('/') {
        return parse_slash_date(trimmed);
    }
    parse_month_name_date(trimmed)
}

/// `M/D/YYYY` or `M/D/YY`, month-first as the original data set used.
fn parse_slash_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.split('/');
    let month: u32 = parts.next()?.parse().ok()?;
    let day: u32 = parts.next()?.parse().ok()?;
    let year_raw: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let year = if year_raw < 100 {
        // two-digit years pivot at 70, matching the upstream parser
        if year_raw < 70 {
            2000 + year_raw
        } else {
            1900 + year_raw
        }
    } else {
        year_raw
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `Jan 5, 2020`, `january 5` and similar month-name forms.
fn parse_month_name_date(raw: &str) -> Option<NaiveDate> {
    let lower = raw.to_lowercase();
    let month = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    let rest = lower.split_whitespace().skip(1).collect::<Vec<_>>().join(" ");
    let mut pieces = rest.splitn(2, ',');
    let day: u32 = pieces.next()?.trim().parse().ok()?;
    let year: i32 = match pieces.next() {
        Some(y) => y.trim().parse().ok()?,
        None => Utc::now().year(),
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Rewrite date-shaped substrings to ISO form, left to right, tracking the
/// cumulative length drift so later replacements land correctly.
pub fn normalize_dates(text: &str) -> (String, Vec<DateConversion>) {
    let mut conversions = Vec::new();
    let mut rewritten = text.to_string();
    let mut drift: isize = 0;

    for m in DATE_RE.find_iter(text) {
        let Some(date) = parse_date_candidate(m.as_str()) else {
            continue;
        };
        let iso = date.format("%Y-%m-%d").to_string();
        let lo = (m.start() as isize + drift) as usize;
        let hi = (m.end() as isize + drift) as usize;
        rewritten.replace_range(lo..hi, &iso);
        drift += iso.len() as isize - m.as_str().len() as isize;
        conversions.push(DateConversion {
            raw: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
            normalized: iso,
        });
    }
    (rewritten, conversions)
}

/// Rewrite `<number><unit>` substrings to a canonical `<meters> m` form.
pub fn normalize_units(text: &str) -> (String, Vec<UnitConversion>) {
    let mut conversions = Vec::new();
    let mut rewritten = text.to_string();
    let mut drift: isize = 0;

    for caps in UNIT_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let value: f64 = match caps["val"].parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        let unit = caps["unit"].to_lowercase();
        let Some(factor) = unit_factor(&unit) else {
            continue;
        };
        let meters = value * factor;
        let replacement = format!("{meters:.3} m");
        let lo = (whole.start() as isize + drift) as usize;
        let hi = (whole.end() as isize + drift) as usize;
        rewritten.replace_range(lo..hi, &replacement);
        drift += replacement.len() as isize - whole.as_str().len() as isize;
        conversions.push(UnitConversion {
            raw: whole.as_str().to_string(),
            start: whole.start(),
            end: whole.end(),
            value,
            unit,
            meters,
        });
    }
    (rewritten, conversions)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const FRAGMENTS: &[&str] = &[
        "show", "stars", "mass", "above", "under", "400", "3.2 miles", "5 km", "10 ft",
        "2020-01-01", "6/23/2025", "Jan 5, 2020", "close approach date",
    ];

    fn arb_request() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(FRAGMENTS), 1..8)
            .prop_map(|parts| parts.join(" "))
    }

    proptest! {
        /// A second normalizer run must never rewrite its own output.
        #[test]
        fn normalization_is_idempotent(input in arb_request()) {
            let (dated, _) = normalize_dates(&input);
            let (normalized, _) = normalize_units(&dated);
            let (dated_again, _) = normalize_dates(&normalized);
            let (normalized_again, _) = normalize_units(&dated_again);
            prop_assert_eq!(normalized, normalized_again);
        }
    }
}
