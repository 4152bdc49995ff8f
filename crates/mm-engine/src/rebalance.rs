//! Epoch-driven reconciliation: health check, periodic cancel, plan, submit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use mm_core::{BasicMMConfig, EpochReport, Market, Rate};

use crate::basis::BasisPriceOracle;
use crate::fee_gap::FeeGapCalculator;
use crate::interfaces::{BookHandle, CoreAdaptor, OracleSource};
use crate::planner::{PlacementPlanner, PlannerInput};

/// Non-reentrant gate around one bot's rebalance body. Modeled on
/// `HardStopLatch::trigger`'s "set this flag exactly once, across threads"
/// shape: a plain `AtomicBool` driven by `compare_exchange`, released via
/// an RAII ticket so a panicking or early-returning body cannot leave the
/// bot permanently non-reentrant.
pub struct ReentrancyGuard {
    running: AtomicBool,
}

impl Default for ReentrancyGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self { running: AtomicBool::new(false) }
    }

    /// Attempts to enter; returns `None` if a rebalance is already running.
    pub fn try_enter(&self) -> Option<ReentrancyTicket<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ReentrancyTicket { guard: self })
    }
}

pub struct ReentrancyTicket<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for ReentrancyTicket<'_> {
    fn drop(&mut self) {
        self.guard.running.store(false, Ordering::Release);
    }
}

/// The basis price captured on the first successful quote cycle. Written
/// at most once; every later attempt is a no-op.
#[derive(Default)]
pub struct FirstReliableBasis(OnceLock<Rate>);

impl FirstReliableBasis {
    pub fn new() -> Self {
        Self(OnceLock::new())
    }

    pub fn set_if_absent(&self, value: Rate) {
        let _ = self.0.set(value);
    }

    /// The captured anchor, or `fallback` if nothing has been captured yet
    /// (the very first epoch: the freshly-resolved basis is its own anchor).
    pub fn get_or(&self, fallback: Rate) -> Rate {
        *self.0.get().unwrap_or(&fallback)
    }
}

/// Runs one rebalance body without the re-entrancy gate. Exposed
/// separately from [`rebalance_guarded`] so the gate and the body can be
/// tested independently.
#[allow(clippy::too_many_arguments)]
pub async fn rebalance<A, O, B>(
    adaptor: &A,
    oracle_source: &O,
    book: &B,
    market: &Market,
    config: &BasicMMConfig,
    basis_oracle: &BasisPriceOracle,
    first_reliable_basis: &FirstReliableBasis,
    epoch: u64,
    now_ms: u64,
) -> EpochReport
where
    A: CoreAdaptor,
    O: OracleSource,
    B: BookHandle,
{
    if !adaptor.check_bot_health(epoch).await {
        adaptor.try_cancel_orders(epoch, true).await;
        return EpochReport::empty(epoch);
    }

    if epoch % 2 == 0 {
        adaptor.try_cancel_orders(epoch, false).await;
    }

    let basis_price = match basis_oracle.resolve(adaptor, oracle_source, market, now_ms).await {
        Ok(price) => price,
        Err(problem) => {
            adaptor.try_cancel_orders(epoch, true).await;
            let report = EpochReport::with_problem(epoch, problem);
            adaptor.update_epoch_report(report.clone());
            return report;
        }
    };
    first_reliable_basis.set_if_absent(basis_price);

    let fee_gap = match FeeGapCalculator::compute(adaptor, market.lot_size, basis_price).await {
        Ok(stats) => stats,
        Err(problem) => {
            adaptor.try_cancel_orders(epoch, true).await;
            let report = EpochReport::with_problem(epoch, problem);
            adaptor.update_epoch_report(report.clone());
            return report;
        }
    };
    adaptor.register_fee_gap(fee_gap);

    let input = PlannerInput {
        market,
        strategy: config.strategy,
        sell_placements: &config.sell_placements,
        buy_placements: &config.buy_placements,
        basis_price,
        first_reliable_basis: first_reliable_basis.get_or(basis_price),
        fee_gap: Some(&fee_gap),
        best_buy: book.best_buy().map(|order| order.rate),
        best_sell: book.best_sell().map(|order| order.rate),
    };
    let planned = PlacementPlanner::plan(&input);

    let (_, sells_report) =
        adaptor.multi_trade(&planned.sells, true, config.drift_tolerance, epoch).await;
    let (_, buys_report) =
        adaptor.multi_trade(&planned.buys, false, config.drift_tolerance, epoch).await;

    let report = EpochReport {
        epoch,
        sells_report: Some(sells_report),
        buys_report: Some(buys_report),
        pre_order_problems: Vec::new(),
    };
    adaptor.update_epoch_report(report.clone());
    report
}

/// Acquires the re-entrancy gate and runs [`rebalance`]; `None` if a
/// rebalance for a previous epoch is still in flight.
#[allow(clippy::too_many_arguments)]
pub async fn rebalance_guarded<A, O, B>(
    guard: &ReentrancyGuard,
    adaptor: &A,
    oracle_source: &O,
    book: &B,
    market: &Market,
    config: &BasicMMConfig,
    basis_oracle: &BasisPriceOracle,
    first_reliable_basis: &FirstReliableBasis,
    epoch: u64,
    now_ms: u64,
) -> Option<EpochReport>
where
    A: CoreAdaptor,
    O: OracleSource,
    B: BookHandle,
{
    let _ticket = guard.try_enter()?;
    Some(
        rebalance(
            adaptor,
            oracle_source,
            book,
            market,
            config,
            basis_oracle,
            first_reliable_basis,
            epoch,
            now_ms,
        )
        .await,
    )
}
