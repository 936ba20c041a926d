use thiserror::Error;

/// A violation of an outbound order contract.
///
/// Raised by [`partition_fields`](crate::normalize::partition_fields) only
/// when the caller requests validation; the same code path serves trusted
/// internal order construction, which skips the checks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("missing mandatory field: {field}")]
    MissingField { field: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Contract(#[from] ContractViolation),

    /// A symbol that cannot be split into "BASE/QUOTE". Analytics skip such
    /// levels rather than surfacing this; it is returned only when a caller
    /// parses a symbol directly.
    #[error("malformed symbol '{symbol}': expected BASE/QUOTE")]
    MalformedSymbol { symbol: String },

    /// A book level violating the price/quantity invariants.
    #[error("invalid book level: {reason}")]
    InvalidLevel { reason: String },

    /// A whole payload that cannot be interpreted by a reconstruction entry
    /// point. Field-level problems never raise this; they degrade to nulls.
    #[error("unusable payload shape: {reason}")]
    Shape { reason: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
