//! Observable outcome of one rebalance epoch.

use crate::error::MMError;
use crate::types::TradePlacement;

/// Outcome of submitting one side's placements via `CoreAdaptor::multi_trade`.
///
/// Opaque beyond being observable output: the core does not interpret
/// these fields, it only aggregates and forwards them.
#[derive(Debug, Clone, Default)]
pub struct OrderReport {
    pub placed: Vec<TradePlacement>,
    pub kept: u32,
    pub cancelled: u32,
    pub failed: Vec<String>,
}

/// Aggregate outcome of one reconciliation.
#[derive(Debug, Clone)]
pub struct EpochReport {
    pub epoch: u64,
    pub buys_report: Option<OrderReport>,
    pub sells_report: Option<OrderReport>,
    /// Errors encountered before any order was submitted this epoch.
    pub pre_order_problems: Vec<MMError>,
}

impl EpochReport {
    pub fn empty(epoch: u64) -> Self {
        Self {
            epoch,
            buys_report: None,
            sells_report: None,
            pre_order_problems: Vec::new(),
        }
    }

    pub fn with_problem(epoch: u64, problem: MMError) -> Self {
        Self {
            epoch,
            buys_report: None,
            sells_report: None,
            pre_order_problems: vec![problem],
        }
    }
}
