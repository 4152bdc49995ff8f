//! Basis-price derivation from the fiat rate and oracle sanity witness.

use parking_lot::Mutex;
use tracing::warn;

use mm_core::{msg_rate, stepped_rate, Market, MMError, Rate, Result};

use crate::interfaces::{FiatRateSource, OracleSource};

const MISMATCH_THRESHOLD: f64 = 0.05;
const MISMATCH_WARN_INTERVAL_MS: u64 = 20 * 60 * 1000;

/// Combines a fiat rate and an oracle rate into a single basis price.
///
/// The fiat rate is preferred because it refreshes faster; the oracle is
/// used purely as a sanity witness. Keeps per-instance state only to
/// rate-limit the divergence warning — the returned error is never
/// suppressed by the throttle.
pub struct BasisPriceOracle {
    last_mismatch_warn_ms: Mutex<Option<u64>>,
}

impl Default for BasisPriceOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl BasisPriceOracle {
    pub fn new() -> Self {
        Self { last_mismatch_warn_ms: Mutex::new(None) }
    }

    pub async fn resolve<F, O>(
        &self,
        fiat_source: &F,
        oracle_source: &O,
        market: &Market,
        now_ms: u64,
    ) -> Result<Rate>
    where
        F: FiatRateSource,
        O: OracleSource,
    {
        let fiat = fiat_source.exchange_rate_from_fiat_sources().await;
        if fiat == 0 {
            return Err(MMError::NoFiatRate);
        }

        let oracle_ratio = oracle_source.market_price(market);
        let oracle = if oracle_ratio.is_finite() { msg_rate(oracle_ratio) } else { 0 };
        if oracle == 0 {
            return Err(MMError::NoOracleRate);
        }

        let mismatch = (oracle as f64 - fiat as f64).abs() / oracle as f64;
        if mismatch > MISMATCH_THRESHOLD {
            self.warn_mismatch(market, fiat, oracle, mismatch, now_ms);
            return Err(MMError::OracleFiatMismatch { fiat, oracle, mismatch });
        }

        Ok(Rate::new(stepped_rate(fiat, market.rate_step)))
    }

    fn warn_mismatch(&self, market: &Market, fiat: u64, oracle: u64, mismatch: f64, now_ms: u64) {
        let mut last = self.last_mismatch_warn_ms.lock();
        let should_log = match *last {
            Some(prev) => now_ms.saturating_sub(prev) >= MISMATCH_WARN_INTERVAL_MS,
            None => true,
        };
        if should_log {
            warn!(
                market = %market,
                fiat,
                oracle,
                mismatch = format!("{mismatch:.4}"),
                "oracle/fiat mismatch exceeds threshold"
            );
            *last = Some(now_ms);
        }
    }
}
