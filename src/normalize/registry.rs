//! Field classification registry.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::CellValue;

/// Semantic class assigned to a column before any transform runs.
///
/// Every column gets exactly one class; the transforms never branch on the
/// runtime shape of individual values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldClass {
    /// Epoch-millisecond integer timestamp.
    TimestampMillis,
    /// ISO-like string timestamp.
    TimestampText,
    Numeric,
    Boolean,
    /// Every present cell is a JSON object; the column is flattened.
    Nested,
    /// Unclassified; the value passes through verbatim.
    Passthrough,
}

/// Static mapping from field name to semantic type.
///
/// Four disjoint name sets plus a set of columns dropped wholesale (raw venue
/// blobs that never belong in canonical output). A registry is an explicit
/// value passed into every normalizer call; there is no ambient global one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldClassificationRegistry {
    pub epoch_timestamp_fields: BTreeSet<String>,
    pub text_timestamp_fields: BTreeSet<String>,
    pub numeric_fields: BTreeSet<String>,
    pub boolean_fields: BTreeSet<String>,
    /// Columns removed before classification.
    pub drop_fields: BTreeSet<String>,
}

fn name_set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

impl FieldClassificationRegistry {
    /// An empty registry: everything passes through unclassified.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry carrying the field names common across venue payloads.
    pub fn venue_default() -> Self {
        Self {
            epoch_timestamp_fields: name_set(&[
                "createTime",
                "created",
                "expiry",
                "time",
                "timestamp",
                "updateTime",
            ]),
            text_timestamp_fields: name_set(&["datetime", "expiryDatetime"]),
            numeric_fields: name_set(&[
                "availableBalance",
                "buySellRatio",
                "buyVol",
                "collateral",
                "collateralMarginLevel",
                "contractSize",
                "contracts",
                "crossUnPnl",
                "crossWalletBalance",
                "entryPrice",
                "free",
                "freeze",
                "initialMargin",
                "initialMarginPercentage",
                "leverage",
                "liquidationPrice",
                "locked",
                "longAccount",
                "longShortRatio",
                "maintMargin",
                "maintenanceMargin",
                "maintenanceMarginPercentage",
                "marginBalance",
                "marginLevel",
                "marginRatio",
                "markPrice",
                "maxNotional",
                "maxWithdrawAmount",
                "notional",
                "openOrderInitialMargin",
                "percentage",
                "positionAmount",
                "positionInitialMargin",
                "sellVol",
                "shortAccount",
                "strike",
                "totalAssetOfBtc",
                "totalCollateralValueInUSDT",
                "totalLiabilityOfBtc",
                "totalNetAssetOfBtc",
                "unrealizedPnl",
                "unrealizedProfit",
                "walletBalance",
                "withdrawing",
            ]),
            boolean_fields: name_set(&["isAutoAddMargin"]),
            drop_fields: name_set(&["info", "fees"]),
        }
    }

    /// Class for a single field by name.
    pub fn classify(&self, field: &str) -> FieldClass {
        if self.epoch_timestamp_fields.contains(field) {
            FieldClass::TimestampMillis
        } else if self.text_timestamp_fields.contains(field) {
            FieldClass::TimestampText
        } else if self.numeric_fields.contains(field) {
            FieldClass::Numeric
        } else if self.boolean_fields.contains(field) {
            FieldClass::Boolean
        } else {
            FieldClass::Passthrough
        }
    }

    /// Class for a whole column.
    ///
    /// Named classes win; an unclassified column is `Nested` only when it is
    /// present in every row and every cell is a JSON object.
    pub fn classify_column(&self, field: &str, cells: &[Option<&CellValue>]) -> FieldClass {
        match self.classify(field) {
            FieldClass::Passthrough => {
                let all_objects = !cells.is_empty()
                    && cells.iter().all(|cell| {
                        matches!(cell, Some(CellValue::Json(Value::Object(_))))
                    });
                if all_objects {
                    FieldClass::Nested
                } else {
                    FieldClass::Passthrough
                }
            }
            class => class,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn venue_default_classifies_the_common_fields() {
        let registry = FieldClassificationRegistry::venue_default();
        assert_eq!(registry.classify("timestamp"), FieldClass::TimestampMillis);
        assert_eq!(registry.classify("datetime"), FieldClass::TimestampText);
        assert_eq!(registry.classify("markPrice"), FieldClass::Numeric);
        assert_eq!(registry.classify("isAutoAddMargin"), FieldClass::Boolean);
        assert_eq!(registry.classify("clientOrderId"), FieldClass::Passthrough);
    }

    #[test]
    fn column_of_objects_in_every_row_is_nested() {
        let registry = FieldClassificationRegistry::new();
        let a = CellValue::from_json(&json!({"min": 1}));
        let b = CellValue::from_json(&json!({"max": 2}));

        let class = registry.classify_column("limits", &[Some(&a), Some(&b)]);
        assert_eq!(class, FieldClass::Nested);
    }

    #[test]
    fn column_missing_from_a_row_is_not_nested() {
        let registry = FieldClassificationRegistry::new();
        let a = CellValue::from_json(&json!({"min": 1}));

        let class = registry.classify_column("limits", &[Some(&a), None]);
        assert_eq!(class, FieldClass::Passthrough);
    }

    #[test]
    fn named_class_wins_over_shape() {
        let mut registry = FieldClassificationRegistry::new();
        registry.numeric_fields.insert("limits".to_string());
        let a = CellValue::from_json(&json!({"min": 1}));

        let class = registry.classify_column("limits", &[Some(&a)]);
        assert_eq!(class, FieldClass::Numeric);
    }
}
