//! Canonical record normalization.
//!
//! Turns arbitrary nested venue payloads into canonical rows: every field is
//! assigned exactly one semantic class by a [`FieldClassificationRegistry`]
//! before any transform runs, then coerced, flattened, or passed through.
//! Coercion fails silently per field; a single malformed value never
//! invalidates the rest of its record.

mod coerce;
mod contract;
mod options;
mod reconstruct;
mod record;
mod registry;
mod table;

pub use contract::{
    partition_fields, timestamps_to_epoch_strings, ContractField, FieldConstraint,
    FieldPartition, OutboundOrderContract, RequiredWhen,
};
pub use options::NormalizeOptions;
pub use reconstruct::{
    extract_children, merge_parent_child, reconstruct_fixed_array_table,
    reconstruct_sided_table, SidedBookOptions, OHLCV_COLUMNS,
};
pub use record::{normalize_json_record, normalize_record};
pub use registry::{FieldClass, FieldClassificationRegistry};
pub use table::{normalize_json_table, normalize_table};
