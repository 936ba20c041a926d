//! Derived analytics records.
//!
//! Output rows produced by the analytics layer, consumed by the (external)
//! calling layer. All are created fresh per invocation and never mutated.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::{Notional, Price, Qty, Side};

/// Achievable liquidity at one requested notional depth for one book group.
///
/// `notional` is the achieved notional, which is below `depth` when the
/// group is thinner than the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepthLiquidity {
    pub symbol: String,
    pub side: Side,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    pub depth: Decimal,
    pub qty: Qty,
    pub notional: Notional,
    /// Volume-weighted average price across the contributing levels.
    pub price: Price,
}

/// A bid/ask crossing between two distinct venues for the same symbol.
///
/// Spread sign is not filtered here; callers rank and decide what counts as
/// an opportunity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitrageOpportunity {
    pub symbol: String,
    pub venue_ask: String,
    pub venue_bid: String,
    pub price_ask: Price,
    pub price_bid: Price,
    /// Executable size, bounded by the thinner leg.
    pub qty: Qty,
    pub spread: Decimal,
    pub relative_spread: Decimal,
}

/// One leg of a triangular cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleLeg {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    pub side: Side,
    pub price: Price,
    pub qty: Qty,
    pub asset_sold: String,
    pub asset_bought: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A closed 3-leg conversion cycle returning to its starting asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitrageCycle {
    /// Identifier shared by the cycle's legs, assigned at discovery time.
    pub id: u64,
    pub spread: Decimal,
    pub relative_spread: Decimal,
    pub legs: [CycleLeg; 3],
}

/// A cycle leg expanded into a flat output row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleLegRow {
    /// Cycle identifier, shared by the three rows of one cycle.
    pub arbitrage: u64,
    /// Execution order within the cycle: 0, 1 or 2.
    pub step: u8,
    pub spread: Decimal,
    pub relative_spread: Decimal,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    pub side: Side,
    pub price: Price,
    pub qty: Qty,
    pub asset_sold: String,
    pub asset_bought: String,
}
