//! Book ordering helpers.

use rust_decimal::Decimal;

use crate::domain::{BookLevel, Side};

/// Price signed so that ascending order puts the best level first on both
/// sides: asks by +price, bids by -price.
pub fn signed_price(level: &BookLevel) -> Decimal {
    match level.side {
        Side::Ask => level.price,
        Side::Bid => -level.price,
    }
}

/// Sort levels best-price-first within each (symbol, side) group, venue
/// outermost when `by_venue` is set.
///
/// The depth aggregator requires this ordering and does not re-sort.
pub fn sort_book(levels: &mut [BookLevel], by_venue: bool) {
    levels.sort_by(|a, b| {
        let venue_order = if by_venue {
            a.venue.cmp(&b.venue)
        } else {
            std::cmp::Ordering::Equal
        };
        venue_order
            .then_with(|| a.symbol.cmp(&b.symbol))
            .then_with(|| a.side.cmp(&b.side))
            .then_with(|| signed_price(a).cmp(&signed_price(b)))
    });
}
