//! Whole-table normalization.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::domain::{CellValue, Record, Table};
use crate::error::Result;

use super::coerce::coerce_cell;
use super::{FieldClass, FieldClassificationRegistry, NormalizeOptions};

/// Normalize a table against `registry`.
///
/// The column set is computed from the input rows, never from a fixed
/// expected list. Each column is assigned exactly one class up front, then
/// coerced; columns whose every present cell is a nested object are expanded
/// into `<parent><separator><child>` columns afterwards. Flattened child
/// columns are not re-coerced, so a second pass over the output is a no-op.
pub fn normalize_table(
    table: &Table,
    registry: &FieldClassificationRegistry,
    options: &NormalizeOptions,
) -> Table {
    // classification step: one class per column, before any transform
    let mut classes: BTreeMap<String, FieldClass> = BTreeMap::new();
    for column in table.columns() {
        if registry.drop_fields.contains(&column) {
            continue;
        }
        let cells: Vec<Option<&CellValue>> =
            table.rows().iter().map(|row| row.get(&column)).collect();
        classes.insert(column.clone(), registry.classify_column(&column, &cells));
    }

    let mut rows: Vec<Record> = Vec::with_capacity(table.len());
    for row in table.rows() {
        let mut out = Record::new();
        for (column, cell) in row.iter() {
            let Some(class) = classes.get(column) else {
                continue; // dropped column
            };
            out.insert(column, coerce_cell(cell, *class));
        }
        rows.push(out);
    }

    if options.drop_empty {
        drop_all_null_coerced_columns(&mut rows, &classes);
    }

    flatten_nested_columns(&mut rows, &classes, &options.flatten_separator);
    Table::from_rows(rows)
}

/// [`normalize_table`] for raw JSON rows, each of which must be an object.
pub fn normalize_json_table(
    rows: &[Value],
    registry: &FieldClassificationRegistry,
    options: &NormalizeOptions,
) -> Result<Table> {
    Ok(normalize_table(&Table::from_json(rows)?, registry, options))
}

/// Drop classified columns that coercion left entirely null.
fn drop_all_null_coerced_columns(rows: &mut [Record], classes: &BTreeMap<String, FieldClass>) {
    for (column, class) in classes {
        if matches!(class, FieldClass::Nested | FieldClass::Passthrough) {
            continue;
        }
        let all_null = rows
            .iter()
            .filter_map(|row| row.get(column))
            .all(|cell| cell.is_null());
        if all_null {
            debug!(%column, "dropping all-null coerced column");
            for row in rows.iter_mut() {
                row.remove(column);
            }
        }
    }
}

fn flatten_nested_columns(
    rows: &mut [Record],
    classes: &BTreeMap<String, FieldClass>,
    separator: &str,
) {
    for (column, class) in classes {
        if *class != FieldClass::Nested {
            continue;
        }
        for row in rows.iter_mut() {
            let Some(CellValue::Json(Value::Object(map))) = row.remove(column) else {
                continue;
            };
            flatten_object(row, column, &map, separator);
        }
    }
}

/// Recursively expand an object into dotted columns, the way nested payloads
/// are conventionally normalized. Arrays and scalars stop the recursion.
fn flatten_object(
    row: &mut Record,
    prefix: &str,
    map: &serde_json::Map<String, Value>,
    separator: &str,
) {
    for (key, value) in map {
        let column = format!("{prefix}{separator}{key}");
        match value {
            Value::Object(child) => flatten_object(row, &column, child, separator),
            other => row.insert(column, CellValue::from_json(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn registry() -> FieldClassificationRegistry {
        FieldClassificationRegistry::venue_default()
    }

    #[test]
    fn columns_are_coerced_per_class() {
        let table = normalize_json_table(
            &[
                json!({"timestamp": 1700000000000u64, "free": "1.5"}),
                json!({"timestamp": 1700000001000u64, "free": "2.5"}),
            ],
            &registry(),
            &NormalizeOptions::default(),
        )
        .unwrap();

        for row in table.rows() {
            assert!(matches!(
                row.get("timestamp"),
                Some(CellValue::Timestamp(_))
            ));
            assert!(matches!(row.get("free"), Some(CellValue::Number(_))));
        }
    }

    #[test]
    fn nested_columns_flatten_with_separator() {
        let table = normalize_json_table(
            &[
                json!({"symbol": "A/B", "limits": {"amount": {"min": 1, "max": 2}}}),
                json!({"symbol": "B/C", "limits": {"amount": {"min": 3, "max": 4}}}),
            ],
            &registry(),
            &NormalizeOptions::default(),
        )
        .unwrap();

        assert_eq!(
            table.columns(),
            vec!["limits.amount.max", "limits.amount.min", "symbol"]
        );
        assert_eq!(
            table.rows()[0].get("limits.amount.min"),
            Some(&CellValue::Number(dec!(1)))
        );
    }

    #[test]
    fn mixed_presence_column_does_not_flatten() {
        let table = normalize_json_table(
            &[
                json!({"fee": {"cost": 1}}),
                json!({"symbol": "A/B"}),
            ],
            &registry(),
            &NormalizeOptions::default(),
        )
        .unwrap();

        // "fee" is absent from the second row, so it stays as passthrough
        assert!(table.columns().contains(&"fee".to_string()));
    }

    #[test]
    fn all_null_coerced_column_is_dropped_with_drop_empty() {
        let options = NormalizeOptions {
            drop_empty: true,
            ..Default::default()
        };
        let table = normalize_json_table(
            &[
                json!({"free": "abc", "symbol": "A/B"}),
                json!({"free": "def", "symbol": "B/C"}),
            ],
            &registry(),
            &options,
        )
        .unwrap();

        assert_eq!(table.columns(), vec!["symbol"]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let options = NormalizeOptions::default();
        let once = normalize_json_table(
            &[
                json!({
                    "timestamp": 1700000000000u64,
                    "datetime": "2023-11-14T22:13:20Z",
                    "free": "1.5",
                    "fee": {"cost": "0.1", "currency": "USDT"},
                }),
                json!({
                    "timestamp": 1700000001000u64,
                    "datetime": "2023-11-14T22:13:21Z",
                    "free": "2.5",
                    "fee": {"cost": "0.2", "currency": "USDT"},
                }),
            ],
            &registry(),
            &options,
        )
        .unwrap();

        let twice = normalize_table(&once, &registry(), &options);
        assert_eq!(once, twice);
    }
}
