//! Capability traits for the engine's external collaborators.
//!
//! `CoreAdaptor` is not one monolithic trait: it is decomposed into the
//! narrow capability sets the Planner, FeeGap Calculator, and Rebalance
//! Loop each actually need, then recombined into a single blanket trait
//! for the concrete adaptor the surrounding DEX client provides. This
//! keeps test doubles small — a fee-gap test only has to implement
//! `FeeSource`, not the whole adaptor surface.
//!
//! Suspendable operations (anything that crosses into the DEX client or
//! a network call) are `async fn`; everything else is a plain sync
//! method. `async fn` in a trait produces a non-`Send` return future
//! unless the implementer's future happens to be `Send`; the engine
//! itself never requires `Send` futures across an `.await` boundary, so
//! `#[allow(async_fn_in_trait)]` silences the lint rather than pulling
//! in `async-trait` for a single-threaded-executor-friendly codebase.

use mm_core::{EpochReport, FeeGapStats, Market, OrderReport, Rate, TradePlacement};

/// One side of the visible top-of-book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookOrder {
    pub rate: Rate,
}

/// The `ResolvedEpoch` notification payload that triggers a rebalance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedEpoch {
    pub current: u64,
}

/// A feed notification. Only `ResolvedEpoch` drives the rebalance loop;
/// other payloads are observed but otherwise ignored by this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationPayload {
    ResolvedEpoch(ResolvedEpoch),
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub action: String,
    pub market: String,
    pub host: String,
    pub payload: NotificationPayload,
}

/// A short-lived handle onto the order book. The Planner opens one to
/// read best-buy/best-sell and must not hold it past the rebalance that
/// opened it.
pub trait BookHandle: Send + Sync {
    fn best_buy(&self) -> Option<BookOrder>;
    fn best_sell(&self) -> Option<BookOrder>;
}

/// The book's notification stream. Owned by the bot's single consumer
/// task for its whole lifetime.
#[allow(async_fn_in_trait)]
pub trait BookFeed: Send {
    async fn next(&mut self) -> Option<Notification>;
}

/// Subscribing to a market's order book.
#[allow(async_fn_in_trait)]
pub trait BookSync: Send + Sync {
    type Book: BookHandle;
    type Feed: BookFeed;

    async fn sync_book(&self, market: &Market) -> mm_core::Result<(Self::Book, Self::Feed)>;
}

/// Round-trip fee queries, denominated in base-asset atomic units.
#[allow(async_fn_in_trait)]
pub trait FeeSource: Send + Sync {
    async fn order_fees_in_units(
        &self,
        sell: bool,
        use_max: bool,
        basis_price: u64,
    ) -> Result<u64, String>;
}

/// The fiat rate feed backing the Basis-Price Oracle.
#[allow(async_fn_in_trait)]
pub trait FiatRateSource: Send + Sync {
    /// Message-rate units. `0` means unavailable.
    async fn exchange_rate_from_fiat_sources(&self) -> u64;
}

/// The oracle sanity witness backing the Basis-Price Oracle.
pub trait OracleSource: Send + Sync {
    /// A ratio. `0.0` or `NaN` means unavailable.
    fn market_price(&self, market: &Market) -> f64;
}

/// Submitting and cancelling orders.
#[allow(async_fn_in_trait)]
pub trait TradeExecutor: Send + Sync {
    async fn multi_trade(
        &self,
        placements: &[TradePlacement],
        sell: bool,
        drift_tolerance: f64,
        epoch: u64,
    ) -> (u32, OrderReport);

    async fn try_cancel_orders(&self, epoch: u64, force: bool);
}

/// The epoch-driven health gate.
#[allow(async_fn_in_trait)]
pub trait HealthCheck: Send + Sync {
    async fn check_bot_health(&self, epoch: u64) -> bool;
}

/// Observability sinks. Both have no-op defaults so a minimal test
/// double need not implement either.
pub trait Observability: Send + Sync {
    fn register_fee_gap(&self, _stats: FeeGapStats) {}
    fn update_epoch_report(&self, _report: EpochReport) {}
}

/// Everything the surrounding DEX client implements for this bot.
pub trait CoreAdaptor:
    FeeSource + FiatRateSource + BookSync + TradeExecutor + HealthCheck + Observability
{
}

impl<T> CoreAdaptor for T where
    T: FeeSource + FiatRateSource + BookSync + TradeExecutor + HealthCheck + Observability
{
}
