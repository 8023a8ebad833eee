//! Error types for the identity resolution engine

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the capability stores (identity, alias, quarantine).
///
/// The resolver treats any read-side `StoreError` as "no data returned" and
/// degrades to the next tier rather than propagating. Write-side errors on
/// the quarantine path degrade to a failure result without a quarantine id.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store operation timed out: {0}")]
    Timeout(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure modes surfaced through `ResolveResult::error`.
///
/// Resolution failures are never fatal to the caller: they are carried in
/// the result's `success`/`error` fields, not raised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Name could not be normalized")]
    InvalidInput,

    #[error("No match found")]
    NoMatch,

    #[error("Ambiguous match")]
    AmbiguousMatch,
}
