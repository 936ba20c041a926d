//! Integration tests for the liquidity and arbitrage analytics.

use marketframe::analytics::{
    liquidity_at_depths, pairwise_arbitrage, sort_book, triangular_cycles,
};
use marketframe::domain::{book_levels_from_table, BookLevel, Side};
use marketframe::normalize::{reconstruct_sided_table, SidedBookOptions};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

fn level(
    symbol: &str,
    side: Side,
    price: Decimal,
    qty: Decimal,
    venue: &str,
) -> BookLevel {
    BookLevel::try_new(symbol, side, price, qty, Some(venue), None).unwrap()
}

#[test]
fn test_depth_aggregation_over_a_reconstructed_snapshot() {
    let payload = json!([
        {
            "symbol": "ETH/USDT",
            "exchange": "alpha",
            "asks": [["2000", "1.0"], ["2010", "2.0"]],
            "bids": [["1999", "1.0"], ["1990", "2.0"]],
        },
        {
            "symbol": "ETH/USDT",
            "exchange": "beta",
            "asks": [["2005", "1.0"]],
            "bids": [["1998", "1.0"]],
        },
    ]);

    let table = reconstruct_sided_table(&payload, &SidedBookOptions::default()).unwrap();
    let mut levels = book_levels_from_table(&table);
    assert_eq!(levels.len(), 6);
    sort_book(&mut levels, true);

    let rows = liquidity_at_depths(&levels, &[dec!(1000), dec!(10000)], true);
    // 4 (symbol, side, venue) groups x 2 depths
    assert_eq!(rows.len(), 8);

    let alpha_asks: Vec<_> = rows
        .iter()
        .filter(|row| row.side == Side::Ask && row.venue.as_deref() == Some("alpha"))
        .collect();
    // depth 1000 stays inside the best ask
    assert_eq!(alpha_asks[0].price, dec!(2000));
    assert_eq!(alpha_asks[0].notional, dec!(1000));
    // depth 10000 exhausts the book: 2000 + 4020 achieved
    assert_eq!(alpha_asks[1].notional, dec!(6020));
}

#[test]
fn test_liquidity_price_never_improves_with_depth_on_asks() {
    let levels = vec![
        level("ETH/USDT", Side::Ask, dec!(2000), dec!(1), "alpha"),
        level("ETH/USDT", Side::Ask, dec!(2010), dec!(1), "alpha"),
        level("ETH/USDT", Side::Ask, dec!(2050), dec!(5), "alpha"),
    ];

    let rows = liquidity_at_depths(
        &levels,
        &[dec!(500), dec!(2500), dec!(5000), dec!(50000)],
        false,
    );
    for pair in rows.windows(2) {
        assert!(pair[1].price >= pair[0].price);
        assert!(pair[1].notional >= pair[0].notional);
    }
}

#[test]
fn test_pairwise_crossing_between_two_venues() {
    let levels = vec![
        level("BTC/USDT", Side::Ask, dec!(100), dec!(1), "alpha"),
        level("BTC/USDT", Side::Bid, dec!(105), dec!(2), "beta"),
        // same-venue bid must not pair with the alpha ask
        level("BTC/USDT", Side::Bid, dec!(104), dec!(1), "alpha"),
    ];

    let out = pairwise_arbitrage(&levels);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].spread, dec!(5));
    assert_eq!(out[0].qty, dec!(1));
    assert_eq!(out[0].venue_ask, "alpha");
    assert_eq!(out[0].venue_bid, "beta");
}

#[test]
fn test_triangular_loop_detected_once_with_chained_legs() {
    let levels = vec![
        level("A/B", Side::Ask, dec!(2), dec!(10), "alpha"),
        level("B/C", Side::Ask, dec!(4), dec!(10), "alpha"),
        level("C/A", Side::Ask, dec!(8), dec!(10), "alpha"),
    ];

    let rows = triangular_cycles(&levels);
    assert_eq!(rows.len(), 3);

    let id = rows[0].arbitrage;
    assert!(rows.iter().all(|row| row.arbitrage == id));
    for step in 0..3usize {
        assert_eq!(rows[step].step as usize, step);
        assert_eq!(
            rows[step].asset_bought,
            rows[(step + 1) % 3].asset_sold
        );
    }
    // legs return the starting asset: sold assets cover all three
    let sold: Vec<_> = rows.iter().map(|row| row.asset_sold.as_str()).collect();
    assert!(sold.contains(&"A") && sold.contains(&"B") && sold.contains(&"C"));
}

#[test]
fn test_empty_snapshot_produces_empty_analytics() {
    let levels: Vec<BookLevel> = Vec::new();
    assert!(liquidity_at_depths(&levels, &[dec!(100)], false).is_empty());
    assert!(pairwise_arbitrage(&levels).is_empty());
    assert!(triangular_cycles(&levels).is_empty());
}
