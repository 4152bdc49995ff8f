//! Placement ladder configuration.

use serde::{Deserialize, Serialize};

use crate::error::{MMError, Result};

/// Gap-strategy selector. Each variant's domain constrains the
/// `gap_factor` of every `OrderPlacement` configured while it is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapStrategy {
    /// `gap_factor` multiplies the break-even half-spread. Domain `[1, 100]`.
    Multiplier,
    /// `gap_factor` is a rate delta. Domain `[0, +inf)`.
    Absolute,
    /// Like `Absolute`, plus the break-even half-spread. Domain `[0, +inf)`.
    AbsolutePlus,
    /// `gap_factor` is a ratio of the basis price. Domain `[0, 0.1]`.
    Percent,
    /// Like `Percent`, plus the break-even half-spread. Domain `[0, 0.1]`.
    PercentPlus,
    /// `gap_factor` is a minimum gap ratio to the reference price. Domain
    /// `[0, 0.1]`.
    Competitive,
}

impl GapStrategy {
    /// Whether placements under this strategy need the break-even
    /// half-spread computed before planning.
    pub fn needs_break_even_half_spread(&self) -> bool {
        matches!(self, Self::Multiplier | Self::AbsolutePlus | Self::PercentPlus)
    }

    /// Check `gap_factor` against this strategy's domain.
    pub fn validate_gap_factor(&self, gap_factor: f64) -> Result<()> {
        if !gap_factor.is_finite() {
            return Err(MMError::ConfigInvalid {
                field: "gap_factor".to_string(),
                reason: format!("{gap_factor} is not finite"),
            });
        }
        let in_domain = match self {
            Self::Multiplier => (1.0..=100.0).contains(&gap_factor),
            Self::Absolute | Self::AbsolutePlus => gap_factor >= 0.0,
            Self::Percent | Self::PercentPlus | Self::Competitive => {
                (0.0..=0.1).contains(&gap_factor)
            }
        };
        if in_domain {
            Ok(())
        } else {
            Err(MMError::ConfigInvalid {
                field: "gap_factor".to_string(),
                reason: format!("{gap_factor} out of domain for {self:?}"),
            })
        }
    }
}

/// One rung of a placement ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderPlacement {
    pub lots: u64,
    pub gap_factor: f64,
}

impl OrderPlacement {
    pub fn new(lots: u64, gap_factor: f64) -> Self {
        Self { lots, gap_factor }
    }
}

fn default_drift_tolerance() -> f64 {
    0.001
}

/// The active market-making configuration: strategy, ladders, drift
/// tolerance. Placements are ordered — the first placement on a side has
/// priority when balance is short.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicMMConfig {
    pub strategy: GapStrategy,
    pub sell_placements: Vec<OrderPlacement>,
    pub buy_placements: Vec<OrderPlacement>,
    #[serde(default = "default_drift_tolerance")]
    pub drift_tolerance: f64,
}

impl BasicMMConfig {
    /// Validate this configuration: drift tolerance range, per-placement
    /// gap-factor domain, and duplicate gap factors within a side.
    ///
    /// Runs once at load/hot-swap time; the Planner trusts an
    /// already-validated snapshot.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=0.01).contains(&self.drift_tolerance) {
            return Err(MMError::ConfigInvalid {
                field: "drift_tolerance".to_string(),
                reason: format!("{} outside [0, 0.01]", self.drift_tolerance),
            });
        }
        Self::validate_side("sell_placements", &self.sell_placements, self.strategy)?;
        Self::validate_side("buy_placements", &self.buy_placements, self.strategy)?;
        Ok(())
    }

    fn validate_side(
        field: &str,
        placements: &[OrderPlacement],
        strategy: GapStrategy,
    ) -> Result<()> {
        let mut seen: Vec<f64> = Vec::with_capacity(placements.len());
        for placement in placements {
            strategy.validate_gap_factor(placement.gap_factor)?;
            if seen.iter().any(|g| (*g - placement.gap_factor).abs() < f64::EPSILON) {
                return Err(MMError::ConfigInvalid {
                    field: field.to_string(),
                    reason: format!("duplicate gap_factor {}", placement.gap_factor),
                });
            }
            seen.push(placement.gap_factor);
        }
        Ok(())
    }
}
