//! Row-oriented canonical tables.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

use super::CellValue;

/// One canonical row: column name to typed cell.
///
/// Backed by a `BTreeMap` so column order is deterministic regardless of the
/// key order a venue happens to serialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    cells: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a raw JSON object into typed cells.
    pub fn from_json(map: &Map<String, Value>) -> Self {
        let cells = map
            .iter()
            .map(|(k, v)| (k.clone(), CellValue::from_json(v)))
            .collect();
        Self { cells }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<CellValue> {
        self.cells.remove(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Remove every null-valued cell.
    pub fn drop_nulls(&mut self) {
        self.cells.retain(|_, v| !v.is_null());
    }
}

impl FromIterator<(String, CellValue)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, CellValue)>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Row-oriented table with named columns.
///
/// The column set is always computed from the rows actually present; a column
/// missing from a row is absent, never padded with nulls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Record>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    /// Build a table from raw JSON rows; every row must be an object.
    pub fn from_json(rows: &[Value]) -> Result<Self> {
        let mut table = Self::new();
        for (index, row) in rows.iter().enumerate() {
            match row {
                Value::Object(map) => table.push(Record::from_json(map)),
                other => {
                    return Err(Error::Shape {
                        reason: format!("row {index} is not an object: {other}"),
                    })
                }
            }
        }
        Ok(table)
    }

    pub fn push(&mut self, row: Record) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut Vec<Record> {
        &mut self.rows
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    /// Union of the column names across all rows, in sorted order.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = BTreeSet::new();
        for row in &self.rows {
            for column in row.columns() {
                columns.insert(column.to_string());
            }
        }
        columns.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<Record> for Table {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Table {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
