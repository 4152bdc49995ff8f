//! Core domain types for the basic market-making engine.
//!
//! Provides the fundamental types used by `mm-engine`:
//! - `Rate`, `stepped_rate`, `msg_rate`: integer rate arithmetic
//! - `Market`: immutable market specification
//! - `GapStrategy`, `OrderPlacement`, `BasicMMConfig`: ladder configuration
//! - `TradePlacement`, `FeeGapStats`: planner output
//! - `OrderReport`, `EpochReport`: observable rebalance outcome
//! - `MMError`: tagged error kinds

pub mod config;
pub mod error;
pub mod market;
pub mod rate;
pub mod report;
pub mod types;

pub use config::{BasicMMConfig, GapStrategy, OrderPlacement};
pub use error::{MMError, Result};
pub use market::Market;
pub use rate::{msg_rate, stepped_rate, Rate, RATE_ENCODING_FACTOR};
pub use report::{EpochReport, OrderReport};
pub use types::{FeeGapStats, TradePlacement};
