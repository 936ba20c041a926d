//! Symbol parsing.

use std::fmt;

use crate::error::{Error, Result};

/// A "BASE/QUOTE" trading pair split into its two assets.
///
/// The inner strings are private so every value goes through [`parse`] and
/// is known to be well formed.
///
/// [`parse`]: SymbolPair::parse
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolPair {
    base: String,
    quote: String,
}

impl SymbolPair {
    /// Split a symbol on its separator.
    ///
    /// Requires exactly one `/` with a non-empty asset on each side.
    pub fn parse(symbol: &str) -> Result<Self> {
        let parts: Vec<&str> = symbol.split('/').collect();
        match parts.as_slice() {
            [base, quote] if !base.is_empty() && !quote.is_empty() => Ok(Self {
                base: (*base).to_string(),
                quote: (*quote).to_string(),
            }),
            _ => Err(Error::MalformedSymbol {
                symbol: symbol.to_string(),
            }),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }
}

impl fmt::Display for SymbolPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_base_and_quote() {
        let pair = SymbolPair::parse("ETH/BTC").unwrap();
        assert_eq!(pair.base(), "ETH");
        assert_eq!(pair.quote(), "BTC");
        assert_eq!(pair.to_string(), "ETH/BTC");
    }

    #[test]
    fn rejects_malformed_symbols() {
        for symbol in ["ETHBTC", "ETH/", "/BTC", "A/B/C", ""] {
            let err = SymbolPair::parse(symbol).unwrap_err();
            assert!(matches!(err, Error::MalformedSymbol { .. }), "{symbol}");
        }
    }
}
