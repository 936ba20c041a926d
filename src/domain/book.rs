//! Order book level types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::{CellValue, Price, Qty, Record, Table};

/// Book side.
///
/// `Ask` orders before `Bid`, matching the sort order of the wire spellings
/// used in canonical side columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "asks")]
    Ask,
    #[serde(rename = "bids")]
    Bid,
}

impl Side {
    /// The wire spelling written into canonical `side` columns.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ask => "asks",
            Self::Bid => "bids",
        }
    }

    /// Accepts the spellings venues use: ask/asks/sell and bid/bids/buy.
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "ask" | "asks" | "sell" => Some(Self::Ask),
            "bid" | "bids" | "buy" => Some(Self::Bid),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resting order-book entry in canonical long form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookLevel {
    pub symbol: String,
    pub side: Side,
    pub price: Price,
    pub qty: Qty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl BookLevel {
    /// Create a level, enforcing price > 0 and qty >= 0.
    pub fn try_new(
        symbol: impl Into<String>,
        side: Side,
        price: Price,
        qty: Qty,
        venue: Option<&str>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        if price <= Price::ZERO {
            return Err(Error::InvalidLevel {
                reason: format!("price must be positive, got {price}"),
            });
        }
        if qty < Qty::ZERO {
            return Err(Error::InvalidLevel {
                reason: format!("qty must be non-negative, got {qty}"),
            });
        }
        Ok(Self {
            symbol: symbol.into(),
            side,
            price,
            qty,
            venue: venue.map(str::to_string),
            timestamp,
        })
    }

    /// Notional value of the level.
    pub fn notional(&self) -> Price {
        self.price * self.qty
    }

    /// Read a level out of a canonical book row.
    ///
    /// Expects `symbol`, `side`, `price` and `qty` columns; venue comes from
    /// an `exchange` or `venue` column when present. Returns `None` when an
    /// essential column is missing or violates the level invariants.
    pub fn from_record(record: &Record) -> Option<Self> {
        let symbol = record.get("symbol")?.as_str()?;
        let side = Side::parse(record.get("side")?.as_str()?)?;
        let price = record.get("price")?.as_decimal()?;
        let qty = record.get("qty")?.as_decimal()?;
        let venue = record
            .get("exchange")
            .or_else(|| record.get("venue"))
            .and_then(CellValue::as_str);
        let timestamp = record.get("timestamp").and_then(CellValue::as_timestamp);
        Self::try_new(symbol, side, price, qty, venue, timestamp).ok()
    }
}

/// Convert a normalized long-form book table into typed levels.
///
/// Rows that cannot be read as a valid level are skipped with a debug log; a
/// single bad row must not abort the snapshot.
pub fn book_levels_from_table(table: &Table) -> Vec<BookLevel> {
    let mut levels = Vec::with_capacity(table.len());
    for (index, row) in table.rows().iter().enumerate() {
        match BookLevel::from_record(row) {
            Some(level) => levels.push(level),
            None => debug!(index, "skipping row that is not a valid book level"),
        }
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    use crate::domain::Table;

    #[test]
    fn side_parses_venue_spellings() {
        assert_eq!(Side::parse("asks"), Some(Side::Ask));
        assert_eq!(Side::parse("SELL"), Some(Side::Ask));
        assert_eq!(Side::parse("bid"), Some(Side::Bid));
        assert_eq!(Side::parse("hold"), None);
    }

    #[test]
    fn try_new_rejects_non_positive_price() {
        let err = BookLevel::try_new("BTC/USDT", Side::Bid, dec!(0), dec!(1), None, None);
        assert!(matches!(err, Err(Error::InvalidLevel { .. })));
    }

    #[test]
    fn notional_is_price_times_qty() {
        let level =
            BookLevel::try_new("BTC/USDT", Side::Ask, dec!(100), dec!(0.5), None, None).unwrap();
        assert_eq!(level.notional(), dec!(50));
    }

    #[test]
    fn levels_from_table_skip_incomplete_rows() {
        let table = Table::from_json(&[
            json!({"symbol": "BTC/USDT", "side": "asks", "price": "100", "qty": "1", "exchange": "alpha"}),
            json!({"symbol": "BTC/USDT", "side": "asks", "price": "100"}),
        ])
        .unwrap();

        let levels = book_levels_from_table(&table);
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].venue.as_deref(), Some("alpha"));
        assert_eq!(levels[0].price, dec!(100));
    }
}
