//! Per-cell coercion primitives.
//!
//! All coercions are total: an uncoercible value becomes `Null`, never an
//! error, and an already-coerced value is returned unchanged so running the
//! normalizer twice is a no-op.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::{parse_decimal, CellValue};

use super::FieldClass;

pub(crate) fn coerce_cell(cell: &CellValue, class: FieldClass) -> CellValue {
    match class {
        FieldClass::TimestampMillis => coerce_epoch_millis(cell),
        FieldClass::TimestampText => coerce_text_timestamp(cell),
        FieldClass::Numeric => coerce_numeric(cell),
        FieldClass::Boolean => coerce_boolean(cell),
        FieldClass::Nested | FieldClass::Passthrough => cell.clone(),
    }
}

fn coerce_epoch_millis(cell: &CellValue) -> CellValue {
    let millis = match cell {
        CellValue::Timestamp(t) => return CellValue::Timestamp(*t),
        CellValue::Number(d) => d.trunc().to_i64(),
        CellValue::Text(s) => parse_decimal(s).and_then(|d| d.trunc().to_i64()),
        _ => None,
    };
    match millis.and_then(|ms| Utc.timestamp_millis_opt(ms).single()) {
        Some(instant) => CellValue::Timestamp(instant),
        None => CellValue::Null,
    }
}

fn coerce_text_timestamp(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Timestamp(t) => CellValue::Timestamp(*t),
        CellValue::Text(s) => match parse_instant(s.trim()) {
            Some(instant) => CellValue::Timestamp(instant),
            None => CellValue::Null,
        },
        _ => CellValue::Null,
    }
}

/// Accepts RFC 3339 and the common unzoned venue spellings; unzoned instants
/// are taken as UTC.
fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

fn coerce_numeric(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Number(d) => CellValue::Number(*d),
        CellValue::Text(s) => match parse_decimal(s) {
            Some(d) => CellValue::Number(d),
            None => CellValue::Null,
        },
        CellValue::Bool(b) => CellValue::Number(if *b { Decimal::ONE } else { Decimal::ZERO }),
        _ => CellValue::Null,
    }
}

fn coerce_boolean(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Bool(b) => CellValue::Bool(*b),
        CellValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => CellValue::Bool(true),
            "false" | "0" | "" => CellValue::Bool(false),
            // any other non-empty string is truthy
            _ => CellValue::Bool(true),
        },
        CellValue::Number(d) => CellValue::Bool(!d.is_zero()),
        _ => CellValue::Null,
    }
}
