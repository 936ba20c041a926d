//! Marketframe - canonical tabular normalization and order-book analytics.
//!
//! This crate turns heterogeneous market-data and trading-object payloads from
//! multiple venues into canonical row-oriented tables with consistent, typed
//! columns, and computes depth-aware liquidity and arbitrage analytics over
//! order-book snapshots.
//!
//! # Architecture
//!
//! The crate is a pure, synchronous data-transformation layer. It performs no
//! network or file I/O and keeps no state between calls: the (external)
//! transport layer hands it already-fetched `serde_json` payloads and consumes
//! canonical tables and typed records back.
//!
//! - **`normalize`** - The field-classification/coercion pipeline
//!   - [`FieldClassificationRegistry`](normalize::FieldClassificationRegistry) - field name to semantic type
//!   - [`normalize_record`](normalize::normalize_record) / [`normalize_table`](normalize::normalize_table) - typed coercion and flattening
//!   - [`reconstruct_sided_table`](normalize::reconstruct_sided_table) - long-form order books from per-side arrays
//!   - [`partition_fields`](normalize::partition_fields) - outbound order contract partitioning
//!
//! - **`analytics`** - Depth-aware book analytics
//!   - [`liquidity_at_depths`](analytics::liquidity_at_depths) - volume-weighted price at target notional depths
//!   - [`pairwise_arbitrage`](analytics::pairwise_arbitrage) - cross-venue bid/ask crossings
//!   - [`triangular_cycles`](analytics::triangular_cycles) - closed 3-leg conversion cycles
//!
//! # Modules
//!
//! - [`domain`] - Venue-agnostic types: cells, records, tables, book levels, result rows
//! - [`normalize`] - Canonical record normalizer and outbound contracts
//! - [`analytics`] - Liquidity aggregation and arbitrage detection
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use marketframe::analytics::{pairwise_arbitrage, sort_book};
//! use marketframe::domain::{BookLevel, Side};
//! use rust_decimal_macros::dec;
//!
//! let mut levels = vec![
//!     BookLevel::try_new("BTC/USDT", Side::Ask, dec!(100), dec!(1), Some("alpha"), None).unwrap(),
//!     BookLevel::try_new("BTC/USDT", Side::Bid, dec!(105), dec!(2), Some("beta"), None).unwrap(),
//! ];
//! sort_book(&mut levels, true);
//!
//! let crossings = pairwise_arbitrage(&levels);
//! assert_eq!(crossings[0].spread, dec!(5));
//! ```

pub mod analytics;
pub mod domain;
pub mod error;
pub mod normalize;

pub use error::{Error, Result};
