//! Monetary types for price and quantity representation.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Quantity represented as a Decimal for precision.
pub type Qty = Decimal;

/// Notional (price x quantity) represented as a Decimal for precision.
pub type Notional = Decimal;
