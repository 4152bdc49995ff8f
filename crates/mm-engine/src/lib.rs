//! Quoting loop for the basic market-making engine.
//!
//! Wires `mm-core`'s domain types into the five collaborating components:
//! the break-even FeeGap Calculator, the Basis-Price Oracle, the
//! Placement Planner, the epoch-driven Rebalance Loop, and Bot Lifecycle.
//! Everything that crosses into the surrounding DEX client is expressed
//! as a capability trait in `interfaces`, so the engine itself has no
//! concrete dependency on a wallet, protocol client, or book-sync
//! implementation.

pub mod basis;
pub mod fee_gap;
pub mod interfaces;
pub mod lifecycle;
pub mod planner;
pub mod rebalance;

pub use basis::BasisPriceOracle;
pub use fee_gap::FeeGapCalculator;
pub use interfaces::{
    BookFeed, BookHandle, BookOrder, BookSync, CoreAdaptor, FeeSource, FiatRateSource, HealthCheck,
    Notification, NotificationPayload, Observability, OracleSource, ResolvedEpoch, TradeExecutor,
};
pub use lifecycle::Bot;
pub use planner::{PlacementPlanner, PlannerInput, PlannerOutput};
pub use rebalance::{rebalance, rebalance_guarded, FirstReliableBasis, ReentrancyGuard};
