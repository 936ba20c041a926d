//! Single-record normalization.

use serde_json::Value;
use tracing::debug;

use crate::domain::Record;
use crate::error::{Error, Result};

use super::coerce::coerce_cell;
use super::{FieldClassificationRegistry, NormalizeOptions};

/// Normalize a single raw record against `registry`.
///
/// Every field is coerced per its class; unclassified fields pass through
/// verbatim. Coercion fails silently per field - an uncoercible value is
/// nulled (and removed under `drop_empty`), never aborting the record.
pub fn normalize_record(
    raw: &Record,
    registry: &FieldClassificationRegistry,
    options: &NormalizeOptions,
) -> Record {
    let mut out = Record::new();
    for (column, cell) in raw.iter() {
        if registry.drop_fields.contains(column) {
            continue;
        }
        let class = registry.classify(column);
        let coerced = coerce_cell(cell, class);
        if coerced.is_null() && !cell.is_null() {
            debug!(column, ?class, "field failed coercion, nulled");
        }
        if options.drop_empty && coerced.is_null() {
            continue;
        }
        out.insert(column, coerced);
    }
    out
}

/// [`normalize_record`] for a raw JSON value, which must be an object.
pub fn normalize_json_record(
    raw: &Value,
    registry: &FieldClassificationRegistry,
    options: &NormalizeOptions,
) -> Result<Record> {
    match raw {
        Value::Object(map) => Ok(normalize_record(
            &Record::from_json(map),
            registry,
            options,
        )),
        other => Err(Error::Shape {
            reason: format!("record is not an object: {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CellValue;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn registry() -> FieldClassificationRegistry {
        FieldClassificationRegistry::venue_default()
    }

    #[test]
    fn classified_fields_are_coerced() {
        let record = normalize_json_record(
            &json!({
                "timestamp": 1700000000000u64,
                "datetime": "2023-11-14T22:13:20Z",
                "markPrice": "42000.5",
                "isAutoAddMargin": "false",
                "clientOrderId": "abc-1",
            }),
            &registry(),
            &NormalizeOptions::default(),
        )
        .unwrap();

        assert!(matches!(
            record.get("timestamp"),
            Some(CellValue::Timestamp(_))
        ));
        assert!(matches!(
            record.get("datetime"),
            Some(CellValue::Timestamp(_))
        ));
        assert_eq!(
            record.get("markPrice"),
            Some(&CellValue::Number(dec!(42000.5)))
        );
        assert_eq!(record.get("isAutoAddMargin"), Some(&CellValue::Bool(false)));
        // unclassified fields pass through untouched
        assert_eq!(record.get("clientOrderId"), Some(&CellValue::Text("abc-1".into())));
    }

    #[test]
    fn malformed_field_never_invalidates_the_record() {
        let record = normalize_json_record(
            &json!({"markPrice": "garbage", "free": "10"}),
            &registry(),
            &NormalizeOptions::default(),
        )
        .unwrap();

        assert!(record.get("markPrice").unwrap().is_null());
        assert_eq!(record.get("free"), Some(&CellValue::Number(dec!(10))));
    }

    #[test]
    fn drop_empty_removes_nulled_fields() {
        let options = NormalizeOptions {
            drop_empty: true,
            ..Default::default()
        };
        let record = normalize_json_record(
            &json!({"markPrice": "garbage", "free": "10"}),
            &registry(),
            &options,
        )
        .unwrap();

        assert!(!record.contains("markPrice"));
        assert!(record.contains("free"));
    }

    #[test]
    fn drop_fields_are_removed_wholesale() {
        let record = normalize_json_record(
            &json!({"info": {"raw": true}, "free": 1}),
            &registry(),
            &NormalizeOptions::default(),
        )
        .unwrap();

        assert!(!record.contains("info"));
    }

    #[test]
    fn non_object_payload_is_a_shape_error() {
        let err = normalize_json_record(
            &json!(["not", "a", "record"]),
            &registry(),
            &NormalizeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Shape { .. }));
    }
}
