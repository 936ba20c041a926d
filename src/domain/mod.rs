//! Venue-agnostic domain types.

mod book;
mod cell;
mod money;
mod result;
mod symbol;
mod table;

pub use book::{book_levels_from_table, BookLevel, Side};
pub use cell::CellValue;
pub(crate) use cell::parse_decimal;
pub use money::{Notional, Price, Qty};
pub use result::{ArbitrageCycle, ArbitrageOpportunity, CycleLeg, CycleLegRow, DepthLiquidity};
pub use symbol::SymbolPair;
pub use table::{Record, Table};
