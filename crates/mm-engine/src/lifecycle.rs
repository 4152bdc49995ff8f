//! Bot lifecycle: subscription, the single consumer task, config hot-reload.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use mm_core::{BasicMMConfig, Market, Result};

use crate::basis::BasisPriceOracle;
use crate::interfaces::{BookFeed, BookHandle, BookSync, CoreAdaptor, NotificationPayload, OracleSource};
use crate::rebalance::{rebalance_guarded, FirstReliableBasis, ReentrancyGuard};

fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

/// One running market-making bot on one market.
///
/// `cfg` is a `parking_lot::RwLock<Arc<BasicMMConfig>>` rather than an
/// atomic pointer type — `ArcSwap` does not appear anywhere in the
/// dependency pack this workspace was grounded on, and `RwLock<Arc<_>>`
/// gives the same single-writer/many-reader snapshot semantics: a reader
/// clones the `Arc` once at rebalance entry and is immune to a concurrent
/// `update_config`.
pub struct Bot<A, O> {
    market: Market,
    cfg: RwLock<Arc<BasicMMConfig>>,
    first_reliable_basis: FirstReliableBasis,
    rebalance_running: ReentrancyGuard,
    basis_oracle: BasisPriceOracle,
    ctx: CancellationToken,
    adaptor: A,
    oracle_source: O,
}

impl<A, O> Bot<A, O>
where
    A: CoreAdaptor,
    O: OracleSource,
{
    pub fn new(market: Market, cfg: BasicMMConfig, adaptor: A, oracle_source: O, ctx: CancellationToken) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            market,
            cfg: RwLock::new(Arc::new(cfg)),
            first_reliable_basis: FirstReliableBasis::new(),
            rebalance_running: ReentrancyGuard::new(),
            basis_oracle: BasisPriceOracle::new(),
            ctx,
            adaptor,
            oracle_source,
        })
    }

    /// The active configuration snapshot.
    pub fn config(&self) -> Arc<BasicMMConfig> {
        self.cfg.read().clone()
    }

    /// Validates `new_cfg`, then atomically swaps it in. On validation
    /// failure the previous configuration is retained and the error is
    /// returned to the caller; the already-running bot keeps operating on
    /// the old snapshot.
    pub fn update_config(&self, new_cfg: BasicMMConfig) -> Result<()> {
        new_cfg.validate()?;
        *self.cfg.write() = Arc::new(new_cfg);
        info!(market = %self.market, "configuration updated");
        Ok(())
    }

    /// Subscribes to the book feed and drains notifications on a single
    /// consumer task (this future) until cancelled. Closes the feed
    /// subscription on exit by letting `feed` drop, whether that exit is
    /// normal (the feed ends) or due to cancellation.
    pub async fn run(&self) -> Result<()> {
        let (book, mut feed) = self.adaptor.sync_book(&self.market).await?;
        info!(market = %self.market, "subscribed to book feed");

        loop {
            tokio::select! {
                _ = self.ctx.cancelled() => {
                    info!(market = %self.market, "cancellation requested, releasing book subscription");
                    break;
                }
                notification = feed.next() => {
                    match notification {
                        Some(notification) => self.handle_notification(&book, notification).await,
                        None => {
                            warn!(market = %self.market, "book feed ended");
                            break;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    async fn handle_notification<B: BookHandle>(&self, book: &B, notification: crate::interfaces::Notification) {
        if let NotificationPayload::ResolvedEpoch(resolved) = notification.payload {
            let cfg = self.config();
            let report = rebalance_guarded(
                &self.rebalance_running,
                &self.adaptor,
                &self.oracle_source,
                book,
                &self.market,
                &cfg,
                &self.basis_oracle,
                &self.first_reliable_basis,
                resolved.current,
                now_ms(),
            )
            .await;
            if report.is_none() {
                warn!(market = %self.market, epoch = resolved.current, "rebalance already in flight, epoch dropped");
            }
        }
    }
}
