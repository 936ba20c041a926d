//! Depth-aware liquidity and arbitrage analytics over canonical book levels.
//!
//! Every function here is pure and stateless: it consumes an immutable
//! snapshot of levels and returns fresh result rows. Groups are independent,
//! so the per-group work could be fanned out across threads; the only
//! ordering guarantee is the deterministic sort of the final output.

mod liquidity;
mod pairwise;
mod sort;
mod triangular;

pub use liquidity::liquidity_at_depths;
pub use pairwise::pairwise_arbitrage;
pub use sort::{signed_price, sort_book};
pub use triangular::{expand_cycles, find_cycles, triangular_cycles};
