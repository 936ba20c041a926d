//! Cross-venue pairwise arbitrage detection.

use rust_decimal::Decimal;

use crate::domain::{ArbitrageOpportunity, BookLevel, Side};

/// Pair every ask level with every bid level for the same symbol on a
/// different venue.
///
/// `spread = price_bid - price_ask`, `relative_spread` is the spread over
/// the mean of the two prices, and the executable quantity is bounded by the
/// thinner leg. Non-positive spreads are reported too; ranking and
/// filtering are the caller's decision. Levels without a venue are skipped -
/// a cross-venue comparison is undefined without one. Combinations across
/// more than two venues belong to the triangular detector.
pub fn pairwise_arbitrage(levels: &[BookLevel]) -> Vec<ArbitrageOpportunity> {
    let two = Decimal::TWO;
    let asks: Vec<&BookLevel> = levels
        .iter()
        .filter(|l| l.side == Side::Ask && l.venue.is_some())
        .collect();
    let bids: Vec<&BookLevel> = levels
        .iter()
        .filter(|l| l.side == Side::Bid && l.venue.is_some())
        .collect();

    let mut out = Vec::new();
    for ask in &asks {
        for bid in &bids {
            if ask.symbol != bid.symbol {
                continue;
            }
            let (venue_ask, venue_bid) = match (&ask.venue, &bid.venue) {
                (Some(a), Some(b)) if a != b => (a.clone(), b.clone()),
                _ => continue,
            };
            let spread = bid.price - ask.price;
            let mid = (ask.price + bid.price) / two;
            let relative_spread = if mid.is_zero() {
                Decimal::ZERO
            } else {
                spread / mid
            };
            out.push(ArbitrageOpportunity {
                symbol: ask.symbol.clone(),
                venue_ask,
                venue_bid,
                price_ask: ask.price,
                price_bid: bid.price,
                qty: ask.qty.min(bid.qty),
                spread,
                relative_spread,
            });
        }
    }
    out
}
