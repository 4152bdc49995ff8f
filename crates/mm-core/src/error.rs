//! Error types for the market-making engine's core domain.

use thiserror::Error;

/// Tagged error kinds produced while deriving a basis price, computing a
/// fee gap, or validating configuration.
///
/// These are expected operational conditions, not exceptional failures:
/// callers abort the current epoch and surface the kind via
/// `EpochReport::pre_order_problems` rather than treating them as panics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MMError {
    #[error("no fiat rate available")]
    NoFiatRate,

    #[error("no oracle rate available")]
    NoOracleRate,

    #[error("oracle/fiat mismatch: fiat={fiat}, oracle={oracle}, mismatch={mismatch:.4}")]
    OracleFiatMismatch { fiat: u64, oracle: u64, mismatch: f64 },

    #[error("basis price is zero")]
    BasisPriceZero,

    #[error("fee query failed: {0}")]
    FeeQueryFailed(String),

    #[error("book sync failed: {0}")]
    BookSyncFailed(String),

    #[error("invalid configuration field `{field}`: {reason}")]
    ConfigInvalid { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, MMError>;
