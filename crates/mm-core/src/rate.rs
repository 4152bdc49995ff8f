//! Integer rate arithmetic.
//!
//! All quoted rates live in message-rate atomic units. Floats are confined
//! to the half-spread and percentage-gap computations elsewhere in the
//! workspace; every float result gets folded back to a `Rate` via `round`.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// `rate / RATE_ENCODING_FACTOR` is the floating-point ratio a rate
/// represents.
pub const RATE_ENCODING_FACTOR: u64 = 100_000_000;

/// A rate expressed in message-rate atomic units.
///
/// Wraps `u64` to keep rates out of reach of plain integer arithmetic
/// that would bypass `stepped_rate`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Rate(pub u64);

impl Rate {
    pub const ZERO: Self = Self(0);

    #[inline]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// `rate / RATE_ENCODING_FACTOR`.
    #[inline]
    pub fn to_ratio(&self) -> f64 {
        self.0 as f64 / RATE_ENCODING_FACTOR as f64
    }

    /// `self - other`, floored at zero (a buy placement under the
    /// runaway-price safety floor has no valid rate below zero).
    #[inline]
    pub fn saturating_sub(&self, other: Rate) -> Rate {
        Rate(self.0.saturating_sub(other.0))
    }

    #[inline]
    pub fn stepped(&self, step: u64) -> Rate {
        Rate(stepped_rate(self.0, step))
    }
}

impl Add for Rate {
    type Output = Rate;

    fn add(self, rhs: Rate) -> Rate {
        Rate(self.0 + rhs.0)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Floor `rate` to the nearest multiple of `step`.
///
/// `step` is guaranteed `>= 1` by the market's invariant; a zero step is
/// treated as a no-op rather than dividing by zero, matching how
/// `round_to_tick` guards a zero tick size.
#[inline]
pub fn stepped_rate(rate: u64, step: u64) -> u64 {
    if step == 0 {
        return rate;
    }
    (rate / step) * step
}

/// Convert a floating-point ratio to message-rate units: `round(ratio *
/// RATE_ENCODING_FACTOR)`. Negative ratios clamp to zero — rates are
/// never negative.
#[inline]
pub fn msg_rate(ratio: f64) -> u64 {
    let scaled = ratio * RATE_ENCODING_FACTOR as f64;
    if scaled <= 0.0 {
        0
    } else {
        scaled.round() as u64
    }
}
