//! Triangular cycle detection.
//!
//! Treats every book level as a directed asset-conversion edge and searches
//! for closed 3-hops that convert an asset back to itself across three
//! distinct symbols.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use tracing::warn;

use crate::domain::{ArbitrageCycle, BookLevel, CycleLeg, CycleLegRow, Side, SymbolPair};

/// A level viewed as a directed conversion: selling one asset for another.
struct Edge<'a> {
    level: &'a BookLevel,
    asset_sold: String,
    asset_bought: String,
}

/// An ask sells the base for the quote; a bid sells the quote and receives
/// the base.
fn edges(levels: &[BookLevel]) -> Vec<Edge<'_>> {
    let mut out = Vec::with_capacity(levels.len());
    for level in levels {
        let pair = match SymbolPair::parse(&level.symbol) {
            Ok(pair) => pair,
            Err(_) => {
                warn!(symbol = %level.symbol, "skipping level with malformed symbol");
                continue;
            }
        };
        let (asset_sold, asset_bought) = match level.side {
            Side::Ask => (pair.base().to_string(), pair.quote().to_string()),
            Side::Bid => (pair.quote().to_string(), pair.base().to_string()),
        };
        out.push(Edge {
            level,
            asset_sold,
            asset_bought,
        });
    }
    out
}

fn leg(edge: &Edge<'_>) -> CycleLeg {
    CycleLeg {
        symbol: edge.level.symbol.clone(),
        venue: edge.level.venue.clone(),
        side: edge.level.side,
        price: edge.level.price,
        qty: edge.level.qty,
        asset_sold: edge.asset_sold.clone(),
        asset_bought: edge.asset_bought.clone(),
        timestamp: edge.level.timestamp,
    }
}

/// Discover closed 3-leg cycles.
///
/// Legs chain on sold/bought assets and close back to the starting asset;
/// the three symbols must be pairwise distinct, so a round-trip on one pair
/// never counts. Rotations of one cycle carry the same relative spread, and
/// only the first cycle per distinct relative spread is kept. Cycle ids are
/// sequential and assigned at discovery time.
pub fn find_cycles(levels: &[BookLevel]) -> Vec<ArbitrageCycle> {
    let edges = edges(levels);
    let mut seen_spreads: BTreeSet<Decimal> = BTreeSet::new();
    let mut cycles = Vec::new();

    for first in &edges {
        for second in &edges {
            if first.asset_bought != second.asset_sold
                || first.level.symbol == second.level.symbol
            {
                continue;
            }
            for third in &edges {
                if second.asset_bought != third.asset_sold
                    || third.asset_bought != first.asset_sold
                {
                    continue;
                }
                if third.level.symbol == first.level.symbol
                    || third.level.symbol == second.level.symbol
                {
                    continue;
                }

                let mut prices = [first.level.price, second.level.price, third.level.price];
                prices.sort();
                let (min, median, max) = (prices[0], prices[1], prices[2]);
                if max.is_zero() {
                    continue;
                }
                let spread = max - median / min;
                let relative_spread = spread / max;

                if !seen_spreads.insert(relative_spread) {
                    continue;
                }
                cycles.push(ArbitrageCycle {
                    id: cycles.len() as u64,
                    spread,
                    relative_spread,
                    legs: [leg(first), leg(second), leg(third)],
                });
            }
        }
    }
    cycles
}

/// Expand cycles into one row per leg, tagged with its step, sorted by
/// (relative spread, cycle id, step) ascending so the most favorable cycles
/// and their ordered legs come first.
pub fn expand_cycles(cycles: &[ArbitrageCycle]) -> Vec<CycleLegRow> {
    let mut rows = Vec::with_capacity(cycles.len() * 3);
    for cycle in cycles {
        for (step, leg) in cycle.legs.iter().enumerate() {
            rows.push(CycleLegRow {
                arbitrage: cycle.id,
                step: step as u8,
                spread: cycle.spread,
                relative_spread: cycle.relative_spread,
                symbol: leg.symbol.clone(),
                venue: leg.venue.clone(),
                side: leg.side,
                price: leg.price,
                qty: leg.qty,
                asset_sold: leg.asset_sold.clone(),
                asset_bought: leg.asset_bought.clone(),
            });
        }
    }
    rows.sort_by(|a, b| {
        a.relative_spread
            .cmp(&b.relative_spread)
            .then_with(|| a.arbitrage.cmp(&b.arbitrage))
            .then_with(|| a.step.cmp(&b.step))
    });
    rows
}

/// Full triangular detector: discovery, rotation de-duplication, per-leg
/// expansion and the deterministic output sort.
pub fn triangular_cycles(levels: &[BookLevel]) -> Vec<CycleLegRow> {
    expand_cycles(&find_cycles(levels))
}
