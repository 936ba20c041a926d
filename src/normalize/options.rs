//! Normalizer options.

use serde::{Deserialize, Serialize};

/// Options controlling normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Remove fields whose coerced value is null; for tables, drop columns
    /// that coercion left entirely null.
    pub drop_empty: bool,

    /// Separator between parent and child names when flattening nested
    /// objects into columns.
    pub flatten_separator: String,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            drop_empty: false,
            flatten_separator: ".".to_string(),
        }
    }
}
