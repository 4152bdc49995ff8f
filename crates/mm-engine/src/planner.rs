//! Translates a placement ladder into concrete limit-order rates.

use mm_core::{stepped_rate, FeeGapStats, GapStrategy, Market, Rate, TradePlacement};

/// Resolved inputs for one planner run. Carries no collaborator handles —
/// best-buy/best-sell are already resolved to `Rate`s by the caller so the
/// planner itself stays purely computational (no suspension points).
pub struct PlannerInput<'a> {
    pub market: &'a Market,
    pub strategy: GapStrategy,
    pub sell_placements: &'a [mm_core::OrderPlacement],
    pub buy_placements: &'a [mm_core::OrderPlacement],
    pub basis_price: Rate,
    pub first_reliable_basis: Rate,
    pub fee_gap: Option<&'a FeeGapStats>,
    pub best_buy: Option<Rate>,
    pub best_sell: Option<Rate>,
}

/// Planner output: one ladder per side, in config order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlannerOutput {
    pub sells: Vec<TradePlacement>,
    pub buys: Vec<TradePlacement>,
}

const RUNAWAY_THRESHOLD: f64 = 0.05;
const BOOK_FALLBACK_BID_RATIO: f64 = 0.96;
const BOOK_FALLBACK_ASK_RATIO: f64 = 1.04;

pub struct PlacementPlanner;

impl PlacementPlanner {
    pub fn plan(input: &PlannerInput<'_>) -> PlannerOutput {
        let (best_buy, best_sell) = Self::resolve_book_reference(input);
        let fee_adj = if input.strategy.needs_break_even_half_spread() {
            input.fee_gap.map(FeeGapStats::half_gap).unwrap_or(0)
        } else {
            0
        };

        let delta = Self::runaway_delta(input.basis_price, input.first_reliable_basis);
        let sell_skipped = delta < -RUNAWAY_THRESHOLD;
        let buy_skipped = delta > RUNAWAY_THRESHOLD;

        let sells = if sell_skipped {
            Vec::new()
        } else {
            Self::plan_side(input, true, fee_adj, best_buy, best_sell)
        };
        let buys = if buy_skipped {
            Vec::new()
        } else {
            Self::plan_side(input, false, fee_adj, best_buy, best_sell)
        };

        PlannerOutput { sells, buys }
    }

    fn runaway_delta(basis: Rate, first_reliable: Rate) -> f64 {
        if first_reliable.is_zero() {
            return 0.0;
        }
        (basis.value() as f64 - first_reliable.value() as f64) / first_reliable.value() as f64
    }

    fn resolve_book_reference(input: &PlannerInput<'_>) -> (Rate, Rate) {
        let step = input.market.rate_step;
        let p = input.basis_price.value() as f64;
        let raw_bid = p * BOOK_FALLBACK_BID_RATIO;
        let raw_ask = p * BOOK_FALLBACK_ASK_RATIO;

        let best_buy = match input.best_buy {
            Some(book_bid) => Rate::new(book_bid.value().max(raw_bid.round() as u64)),
            None => Rate::new(stepped_rate(raw_bid.round() as u64, step)),
        };
        let best_sell = match input.best_sell {
            Some(book_ask) => Rate::new(book_ask.value().min(raw_ask.round() as u64)),
            None => Rate::new(stepped_rate(raw_ask.round() as u64, step)),
        };
        (best_buy, best_sell)
    }

    fn plan_side(
        input: &PlannerInput<'_>,
        sell: bool,
        fee_adj: u64,
        best_buy: Rate,
        best_sell: Rate,
    ) -> Vec<TradePlacement> {
        let placements = if sell { input.sell_placements } else { input.buy_placements };
        let step = input.market.rate_step;
        let p = input.basis_price.value();

        placements
            .iter()
            .map(|placement| {
                if input.strategy == GapStrategy::Competitive {
                    Self::competitive_placement(
                        placement, sell, p, step, best_buy, best_sell,
                    )
                } else {
                    Self::table_placement(input.strategy, placement, sell, p, step, fee_adj)
                }
            })
            .collect()
    }

    fn table_placement(
        strategy: GapStrategy,
        placement: &mm_core::OrderPlacement,
        sell: bool,
        p: u64,
        step: u64,
        fee_adj: u64,
    ) -> TradePlacement {
        let k = placement.gap_factor;
        let adj = match strategy {
            GapStrategy::Multiplier => (fee_adj as f64 * k).round() as u64,
            GapStrategy::Percent => (k * p as f64).round() as u64,
            GapStrategy::PercentPlus => (k * p as f64).round() as u64 + fee_adj,
            GapStrategy::Absolute => mm_core::msg_rate(k),
            GapStrategy::AbsolutePlus => mm_core::msg_rate(k) + fee_adj,
            GapStrategy::Competitive => unreachable!("handled by competitive_placement"),
        };
        let adj = stepped_rate(adj, step);

        if sell {
            TradePlacement { rate: Rate::new(p + adj), lots: placement.lots }
        } else if p >= adj {
            TradePlacement { rate: Rate::new(p - adj), lots: placement.lots }
        } else {
            TradePlacement::SKIPPED
        }
    }

    fn competitive_placement(
        placement: &mm_core::OrderPlacement,
        sell: bool,
        p: u64,
        step: u64,
        best_buy: Rate,
        best_sell: Rate,
    ) -> TradePlacement {
        let k = placement.gap_factor;
        let b = best_buy.value();
        let a = best_sell.value();
        let min_true_gap = (k * p as f64).round() as u64;

        let rate = if sell {
            let start = a.saturating_sub(step);
            let clamped = start.max(p.saturating_add(min_true_gap));
            if clamped <= b {
                b + (k * b as f64).round() as u64
            } else {
                clamped
            }
        } else {
            let start = b.saturating_add(step);
            let clamped = start.min(p.saturating_sub(min_true_gap));
            if clamped >= a {
                a.saturating_sub((k * a as f64).round() as u64)
            } else {
                clamped
            }
        };

        TradePlacement { rate: Rate::new(stepped_rate(rate, step)), lots: placement.lots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::{FeeGapStats, OrderPlacement};

    fn market(rate_step: u64) -> Market {
        Market::new("dcrdex.example", 42, 0, 1_000_000, rate_step, "DCR", "BTC")
    }

    fn placements(pairs: &[(u64, f64)]) -> Vec<OrderPlacement> {
        pairs.iter().map(|(lots, gap)| OrderPlacement::new(*lots, *gap)).collect()
    }

    /// S1 — Basic Percent buy/sell ladder.
    #[test]
    fn test_s1_percent_ladder() {
        let market = market(100);
        let sells = placements(&[(1, 0.01), (2, 0.02)]);
        let buys = placements(&[(1, 0.01), (2, 0.02)]);
        let input = PlannerInput {
            market: &market,
            strategy: GapStrategy::Percent,
            sell_placements: &sells,
            buy_placements: &buys,
            basis_price: Rate::new(1_000_000),
            first_reliable_basis: Rate::new(1_000_000),
            fee_gap: None,
            best_buy: Some(Rate::new(950_000)),
            best_sell: Some(Rate::new(1_050_000)),
        };
        let out = PlacementPlanner::plan(&input);
        assert_eq!(
            out.sells,
            vec![
                TradePlacement { rate: Rate::new(1_010_000), lots: 1 },
                TradePlacement { rate: Rate::new(1_020_000), lots: 2 },
            ]
        );
        assert_eq!(
            out.buys,
            vec![
                TradePlacement { rate: Rate::new(990_000), lots: 1 },
                TradePlacement { rate: Rate::new(980_000), lots: 2 },
            ]
        );
    }

    /// S2 — Runaway up, buys suppressed.
    #[test]
    fn test_s2_runaway_suppresses_buys() {
        let market = market(100);
        let sells = placements(&[(1, 0.01), (2, 0.02)]);
        let buys = placements(&[(1, 0.01), (2, 0.02)]);
        let input = PlannerInput {
            market: &market,
            strategy: GapStrategy::Percent,
            sell_placements: &sells,
            buy_placements: &buys,
            basis_price: Rate::new(1_070_000),
            first_reliable_basis: Rate::new(1_000_000),
            fee_gap: None,
            best_buy: Some(Rate::new(950_000)),
            best_sell: Some(Rate::new(1_050_000)),
        };
        let out = PlacementPlanner::plan(&input);
        assert!(out.buys.is_empty());
        assert_eq!(out.sells.len(), 2);
        assert_eq!(out.sells[0].rate.value(), 1_070_000 + stepped_rate((0.01f64 * 1_070_000.0).round() as u64, 100));
    }

    /// S4 — Competitive clamps to book.
    #[test]
    fn test_s4_competitive_clamps_to_book() {
        let market = market(100);
        let sells = placements(&[(1, 0.001)]);
        let buys = placements(&[(1, 0.001)]);
        let input = PlannerInput {
            market: &market,
            strategy: GapStrategy::Competitive,
            sell_placements: &sells,
            buy_placements: &buys,
            basis_price: Rate::new(1_000_000),
            first_reliable_basis: Rate::new(1_000_000),
            fee_gap: None,
            best_buy: Some(Rate::new(999_900)),
            best_sell: Some(Rate::new(1_000_100)),
        };
        let out = PlacementPlanner::plan(&input);
        assert_eq!(out.sells[0].rate.value(), 1_001_000);
        assert_eq!(out.buys[0].rate.value(), 999_000);
    }

    /// S6 — Zero-rate buy under large adj; sell side unaffected.
    #[test]
    fn test_s6_zero_rate_buy_under_large_adj() {
        let market = market(1);
        let sells = placements(&[(1, 200.0)]);
        let buys = placements(&[(1, 200.0)]);
        let fee_gap = FeeGapStats { basis_price: Rate::new(100), fee_gap: 2, round_trip_fees: 10 };
        let input = PlannerInput {
            market: &market,
            strategy: GapStrategy::AbsolutePlus,
            sell_placements: &sells,
            buy_placements: &buys,
            basis_price: Rate::new(100),
            first_reliable_basis: Rate::new(100),
            fee_gap: Some(&fee_gap),
            best_buy: None,
            best_sell: None,
        };
        let out = PlacementPlanner::plan(&input);
        assert!(out.buys[0].is_skipped());
        assert!(out.sells[0].rate.value() > 100);
        assert_eq!(out.sells[0].lots, 1);
    }

    /// Invariant 7: adverse-sign runaway empties the corresponding side.
    #[test]
    fn test_invariant_runaway_empties_adverse_side() {
        let market = market(100);
        let sells = placements(&[(1, 0.01)]);
        let buys = placements(&[(1, 0.01)]);
        let input = PlannerInput {
            market: &market,
            strategy: GapStrategy::Percent,
            sell_placements: &sells,
            buy_placements: &buys,
            basis_price: Rate::new(940_000),
            first_reliable_basis: Rate::new(1_000_000),
            fee_gap: None,
            best_buy: None,
            best_sell: None,
        };
        let out = PlacementPlanner::plan(&input);
        assert!(out.sells.is_empty());
        assert!(!out.buys.is_empty());
    }

    /// Invariant 1: every non-zero rate is a multiple of rate_step.
    #[test]
    fn test_invariant_rates_are_stepped() {
        let market = market(250);
        let sells = placements(&[(1, 0.013), (2, 0.027)]);
        let buys = placements(&[(1, 0.013), (2, 0.027)]);
        let input = PlannerInput {
            market: &market,
            strategy: GapStrategy::Percent,
            sell_placements: &sells,
            buy_placements: &buys,
            basis_price: Rate::new(1_000_000),
            first_reliable_basis: Rate::new(1_000_000),
            fee_gap: None,
            best_buy: None,
            best_sell: None,
        };
        let out = PlacementPlanner::plan(&input);
        for placement in out.sells.iter().chain(out.buys.iter()) {
            if !placement.is_skipped() {
                assert_eq!(placement.rate.value() % 250, 0);
            }
        }
    }

    /// Invariant 2: sells sit at or above basis, buys at or below (when not skipped).
    #[test]
    fn test_invariant_side_ordering_around_basis() {
        let market = market(100);
        let sells = placements(&[(1, 0.01)]);
        let buys = placements(&[(1, 0.01)]);
        let input = PlannerInput {
            market: &market,
            strategy: GapStrategy::Percent,
            sell_placements: &sells,
            buy_placements: &buys,
            basis_price: Rate::new(1_000_000),
            first_reliable_basis: Rate::new(1_000_000),
            fee_gap: None,
            best_buy: None,
            best_sell: None,
        };
        let out = PlacementPlanner::plan(&input);
        assert!(out.sells[0].rate.value() >= 1_000_000);
        assert!(out.buys[0].rate.value() <= 1_000_000);
    }

    /// Invariant 3: under Competitive, sells clear best_buy and buys clear best_sell.
    #[test]
    fn test_invariant_competitive_clears_book() {
        let market = market(100);
        let sells = placements(&[(1, 0.001)]);
        let buys = placements(&[(1, 0.001)]);
        let input = PlannerInput {
            market: &market,
            strategy: GapStrategy::Competitive,
            sell_placements: &sells,
            buy_placements: &buys,
            basis_price: Rate::new(1_000_000),
            first_reliable_basis: Rate::new(1_000_000),
            fee_gap: None,
            best_buy: Some(Rate::new(999_900)),
            best_sell: Some(Rate::new(1_000_100)),
        };
        let out = PlacementPlanner::plan(&input);
        assert!(out.sells[0].rate.value() > 999_900);
        assert!(out.buys[0].rate.value() < 1_000_100);
    }

    #[test]
    fn test_invariant_stepped_rate_idempotent() {
        for x in [0u64, 7, 100, 1_234_567] {
            for step in [1u64, 10, 100] {
                let once = stepped_rate(x, step);
                assert_eq!(stepped_rate(once, step), once);
            }
        }
    }

    #[test]
    fn test_plan_is_pure() {
        let market = market(100);
        let sells = placements(&[(1, 0.01)]);
        let buys = placements(&[(1, 0.01)]);
        let input = PlannerInput {
            market: &market,
            strategy: GapStrategy::Percent,
            sell_placements: &sells,
            buy_placements: &buys,
            basis_price: Rate::new(1_000_000),
            first_reliable_basis: Rate::new(1_000_000),
            fee_gap: None,
            best_buy: None,
            best_sell: None,
        };
        let first = PlacementPlanner::plan(&input);
        let second = PlacementPlanner::plan(&input);
        assert_eq!(first, second);
    }
}
