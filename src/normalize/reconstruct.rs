//! Reshaping raw payloads into canonical long-form tables.
//!
//! Venues ship order books as one array per side, candles as bare
//! arrays-of-arrays, and orders with their fills embedded. These helpers
//! rebuild row-oriented tables from those shapes; coercion is left to the
//! normalizer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{CellValue, Record, Side, Table};
use crate::error::{Error, Result};

/// Standard candle column names for fixed-array payloads.
pub const OHLCV_COLUMNS: [&str; 6] = ["timestamp", "open", "high", "low", "close", "volume"];

/// Wire keys renamed to canonical column names during reconstruction.
const KEY_RENAMES: [(&str, &str); 2] = [("T", "timestamp"), ("u", "updateId")];

fn canonical_key(key: &str) -> &str {
    KEY_RENAMES
        .iter()
        .find(|(wire, _)| *wire == key)
        .map_or(key, |(_, canonical)| canonical)
}

/// Options for [`reconstruct_sided_table`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidedBookOptions {
    /// Payload keys holding one array of levels per side.
    pub side_keys: Vec<String>,
    /// Snapshot-level keys copied onto every level row when present.
    pub meta_keys: Vec<String>,
}

impl Default for SidedBookOptions {
    fn default() -> Self {
        Self {
            side_keys: vec!["asks".to_string(), "bids".to_string()],
            meta_keys: ["symbol", "timestamp", "datetime", "nonce", "exchange", "T", "u"]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// Rebuild a long-form book table from a payload keyed by side.
///
/// Accepts a single snapshot object or a list of them. Each level row gets
/// an explicit `side` tag and a copy of the snapshot's metadata. Levels may
/// be `[price, qty, ...]` arrays or objects; array levels map their first
/// two entries to `price` and `qty`.
pub fn reconstruct_sided_table(raw: &Value, options: &SidedBookOptions) -> Result<Table> {
    let snapshots: Vec<&Map<String, Value>> = match raw {
        Value::Object(map) => vec![map],
        Value::Array(items) => {
            let mut maps = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                match item {
                    Value::Object(map) => maps.push(map),
                    other => {
                        return Err(Error::Shape {
                            reason: format!("snapshot {index} is not an object: {other}"),
                        })
                    }
                }
            }
            maps
        }
        other => {
            return Err(Error::Shape {
                reason: format!("book payload is neither object nor array: {other}"),
            })
        }
    };

    let mut table = Table::new();
    for side_key in &options.side_keys {
        let side_label = Side::parse(side_key).map_or(side_key.as_str(), |side| side.as_str());
        for snapshot in &snapshots {
            let meta: Vec<(&str, CellValue)> = options
                .meta_keys
                .iter()
                .filter_map(|key| {
                    snapshot
                        .get(key)
                        .map(|value| (canonical_key(key), CellValue::from_json(value)))
                })
                .collect();
            let Some(Value::Array(levels)) = snapshot.get(side_key) else {
                continue;
            };
            for level in levels {
                let mut row = Record::new();
                match level {
                    Value::Array(cells) => {
                        if let Some(price) = cells.first() {
                            row.insert("price", CellValue::from_json(price));
                        }
                        if let Some(qty) = cells.get(1) {
                            row.insert("qty", CellValue::from_json(qty));
                        }
                    }
                    Value::Object(map) => {
                        for (key, value) in map {
                            row.insert(canonical_key(key), CellValue::from_json(value));
                        }
                    }
                    _ => continue,
                }
                for (key, value) in &meta {
                    row.insert(*key, value.clone());
                }
                row.insert("side", side_label);
                table.push(row);
            }
        }
    }
    Ok(table)
}

/// Assign fixed, ordered column names to an array-of-arrays payload.
///
/// Rows shorter than the name list leave the trailing columns absent; cells
/// beyond the name list are ignored. A ragged venue payload must not abort
/// the snapshot.
pub fn reconstruct_fixed_array_table(rows: &[Value], column_names: &[&str]) -> Result<Table> {
    let mut table = Table::new();
    for (index, row) in rows.iter().enumerate() {
        let Value::Array(cells) = row else {
            return Err(Error::Shape {
                reason: format!("row {index} is not an array: {row}"),
            });
        };
        let mut record = Record::new();
        for (name, cell) in column_names.iter().zip(cells) {
            record.insert(*name, CellValue::from_json(cell));
        }
        table.push(record);
    }
    Ok(table)
}

/// Explode an embedded child array into its own table, one row per child,
/// copying the listed parent keys onto each row.
///
/// Parents without the child array (or with an empty one) contribute no
/// rows; combine with [`merge_parent_child`] to keep them.
pub fn extract_children(rows: &[Value], child_key: &str, meta_keys: &[&str]) -> Result<Table> {
    let mut table = Table::new();
    for (index, row) in rows.iter().enumerate() {
        let Value::Object(parent) = row else {
            return Err(Error::Shape {
                reason: format!("row {index} is not an object: {row}"),
            });
        };
        let Some(Value::Array(children)) = parent.get(child_key) else {
            continue;
        };
        for child in children {
            let Value::Object(child_map) = child else {
                continue;
            };
            let mut record = Record::from_json(child_map);
            for key in meta_keys {
                if let Some(value) = parent.get(*key) {
                    record.insert(*key, CellValue::from_json(value));
                }
            }
            table.push(record);
        }
    }
    Ok(table)
}

/// Full outer one-to-many join of `parents` and `children` on `join_keys`.
///
/// Parents with no children keep their row with the child columns absent;
/// orphan children are preserved with the parent columns absent. No row is
/// silently dropped. Child values win on non-key collisions. Join keys that
/// are null (or absent) on both sides compare equal.
pub fn merge_parent_child(parents: &Table, children: &Table, join_keys: &[&str]) -> Table {
    let key_of = |record: &Record| -> Vec<CellValue> {
        join_keys
            .iter()
            .map(|key| record.get(key).cloned().unwrap_or(CellValue::Null))
            .collect()
    };

    let child_keys: Vec<Vec<CellValue>> = children.rows().iter().map(key_of).collect();
    let mut matched = vec![false; children.len()];

    let mut merged = Table::new();
    for parent in parents.rows() {
        let parent_key = key_of(parent);
        let mut any_child = false;
        for (index, child) in children.rows().iter().enumerate() {
            if child_keys[index] != parent_key {
                continue;
            }
            matched[index] = true;
            any_child = true;
            let mut row = parent.clone();
            for (column, cell) in child.iter() {
                row.insert(column, cell.clone());
            }
            merged.push(row);
        }
        if !any_child {
            merged.push(parent.clone());
        }
    }
    for (index, child) in children.rows().iter().enumerate() {
        if !matched[index] {
            merged.push(child.clone());
        }
    }
    merged
}
