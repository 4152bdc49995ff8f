//! Market identification and specification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rate::{stepped_rate, Rate};

/// An immutable market specification.
///
/// All quoted rates on this market are multiples of `rate_step`; all
/// traded quantities are multiples of `lot_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    /// DEX host identifier this market trades on.
    pub host: String,
    pub base_asset_id: u32,
    pub quote_asset_id: u32,
    /// Base-asset atomic units per lot.
    pub lot_size: u64,
    /// Minimum rate increment, in message-rate atomic units.
    pub rate_step: u64,
    pub base_display: String,
    pub quote_display: String,
}

impl Market {
    pub fn new(
        host: impl Into<String>,
        base_asset_id: u32,
        quote_asset_id: u32,
        lot_size: u64,
        rate_step: u64,
        base_display: impl Into<String>,
        quote_display: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            base_asset_id,
            quote_asset_id,
            lot_size,
            rate_step,
            base_display: base_display.into(),
            quote_display: quote_display.into(),
        }
    }

    /// Floor `rate` to this market's `rate_step`.
    #[inline]
    pub fn step(&self, rate: u64) -> Rate {
        Rate::new(stepped_rate(rate, self.rate_step))
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.base_display, self.quote_display)
    }
}
