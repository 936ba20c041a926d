//! Depth-limited liquidity aggregation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::domain::{BookLevel, DepthLiquidity, Side};

type GroupKey = (String, Side, Option<String>);

/// Volume-weighted average price achievable at each target notional depth,
/// per (symbol, side) group - per (symbol, side, venue) when `by_venue`.
///
/// Levels must already be ordered best-price-first within each group (see
/// [`sort_book`](super::sort_book)); this function never re-sorts. A level
/// contributes its full notional while the running cumulative stays inside
/// the depth budget; the level straddling the boundary contributes only the
/// remainder, and deeper levels contribute nothing. When a group is thinner
/// than the requested depth the row reports the notional actually achieved.
/// Groups with no levels are simply absent from the output.
pub fn liquidity_at_depths(
    levels: &[BookLevel],
    depths: &[Decimal],
    by_venue: bool,
) -> Vec<DepthLiquidity> {
    let mut groups: BTreeMap<GroupKey, Vec<&BookLevel>> = BTreeMap::new();
    for level in levels {
        let venue = if by_venue { level.venue.clone() } else { None };
        groups
            .entry((level.symbol.clone(), level.side, venue))
            .or_default()
            .push(level);
    }

    let mut out = Vec::new();
    for ((symbol, side, venue), group) in groups {
        for &depth in depths {
            let mut cum_before = Decimal::ZERO;
            let mut sum_notional = Decimal::ZERO;
            let mut sum_qty = Decimal::ZERO;
            for level in &group {
                if cum_before >= depth {
                    break;
                }
                let notional = level.notional();
                let contributed = if cum_before + notional <= depth {
                    notional
                } else {
                    depth - cum_before
                };
                sum_notional += contributed;
                sum_qty += contributed / level.price;
                cum_before += notional;
            }
            if sum_qty.is_zero() {
                continue;
            }
            out.push(DepthLiquidity {
                symbol: symbol.clone(),
                side,
                venue: venue.clone(),
                depth,
                qty: sum_qty,
                notional: sum_notional,
                price: sum_notional / sum_qty,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ask(symbol: &str, price: Decimal, qty: Decimal, venue: Option<&str>) -> BookLevel {
        BookLevel::try_new(symbol, Side::Ask, price, qty, venue, None).unwrap()
    }

    #[test]
    fn single_level_within_depth_yields_its_price() {
        let levels = [ask("BTC/USDT", dec!(100), dec!(2), None)];

        let rows = liquidity_at_depths(&levels, &[dec!(150)], false);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].price, dec!(100));
        assert_eq!(rows[0].notional, dec!(150));
        assert_eq!(rows[0].qty, dec!(1.5));
    }

    #[test]
    fn depth_beyond_the_book_reports_achieved_notional() {
        let levels = [ask("BTC/USDT", dec!(100), dec!(2), None)];

        let rows = liquidity_at_depths(&levels, &[dec!(500)], false);
        assert_eq!(rows[0].notional, dec!(200));
        assert_eq!(rows[0].depth, dec!(500));
        assert_eq!(rows[0].price, dec!(100));
    }

    #[test]
    fn straddling_level_contributes_only_the_remainder() {
        let levels = [
            ask("BTC/USDT", dec!(100), dec!(1), None),
            ask("BTC/USDT", dec!(110), dec!(1), None),
        ];

        // first level fills 100, second contributes 55 of its 110
        let rows = liquidity_at_depths(&levels, &[dec!(155)], false);
        assert_eq!(rows[0].notional, dec!(155));
        assert_eq!(rows[0].qty, dec!(1) + dec!(0.5));
        assert_eq!(rows[0].price, dec!(155) / dec!(1.5));
    }

    #[test]
    fn achieved_notional_is_monotonic_in_depth() {
        let levels = [
            ask("BTC/USDT", dec!(100), dec!(1), None),
            ask("BTC/USDT", dec!(110), dec!(2), None),
            ask("BTC/USDT", dec!(120), dec!(3), None),
        ];

        let depths = [dec!(50), dec!(150), dec!(400), dec!(10000)];
        let rows = liquidity_at_depths(&levels, &depths, false);
        for pair in rows.windows(2) {
            assert!(pair[1].notional >= pair[0].notional);
        }
    }

    #[test]
    fn groups_split_by_venue_when_requested() {
        let levels = [
            ask("BTC/USDT", dec!(100), dec!(1), Some("alpha")),
            ask("BTC/USDT", dec!(101), dec!(1), Some("beta")),
        ];

        let merged = liquidity_at_depths(&levels, &[dec!(100)], false);
        assert_eq!(merged.len(), 1);

        let split = liquidity_at_depths(&levels, &[dec!(100)], true);
        assert_eq!(split.len(), 2);
        assert_eq!(split[0].venue.as_deref(), Some("alpha"));
        assert_eq!(split[1].venue.as_deref(), Some("beta"));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(liquidity_at_depths(&[], &[dec!(100)], false).is_empty());
    }
}
