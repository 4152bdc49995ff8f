//! Break-even half-spread calculation.

use mm_core::{FeeGapStats, MMError, Rate, Result, RATE_ENCODING_FACTOR};
use tracing::debug;

use crate::interfaces::FeeSource;

/// Computes the break-even half-spread for a basis price: the per-side
/// rate offset at which a round-trip (sell then buy one lot) exactly
/// covers aggregate round-trip fees.
pub struct FeeGapCalculator;

impl FeeGapCalculator {
    /// `(r+g)*l / (r-g) = l + f` solved for `g`, where `r` is the basis
    /// price as a ratio, `l` is the lot size, and `f` is the aggregate
    /// round-trip fee in base-asset atomic units.
    pub async fn compute<A: FeeSource>(
        adaptor: &A,
        lot_size: u64,
        basis_price: Rate,
    ) -> Result<FeeGapStats> {
        if basis_price.is_zero() {
            return Err(MMError::BasisPriceZero);
        }

        let sell_fees = adaptor
            .order_fees_in_units(true, true, basis_price.value())
            .await
            .map_err(MMError::FeeQueryFailed)?;
        let buy_fees = adaptor
            .order_fees_in_units(false, true, basis_price.value())
            .await
            .map_err(MMError::FeeQueryFailed)?;

        let f = (sell_fees + buy_fees) as f64;
        let l = lot_size as f64;
        let r = basis_price.to_ratio();
        let g = f * r / (f + 2.0 * l);
        let half_gap = (g * RATE_ENCODING_FACTOR as f64).round().max(0.0) as u64;

        let stats = FeeGapStats {
            basis_price,
            fee_gap: half_gap * 2,
            round_trip_fees: sell_fees + buy_fees,
        };
        debug!(?stats, "computed fee gap");
        Ok(stats)
    }
}
