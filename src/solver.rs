use crate::column::best_factored_arrangement;
use crate::config::SearchConfig;
use crate::flexible::try_flexible_arrangement;
use crate::geometry::{fits_in_pallet, theoretical_max};
use crate::patterns::try_smart_patterns;
use crate::types::{Arrangement, BoxDims, Pallet, Solution, StrategyKind};

/// One stage of the search. `None` means the stage found nothing.
pub type Strategy =
    fn(&BoxDims, usize, &Pallet, &SearchConfig) -> Option<(StrategyKind, Arrangement)>;

/// Stages in the order they are tried.
pub const STRATEGY_CHAIN: [Strategy; 3] = [column_packer, flexible_search, smart_patterns];

fn column_packer(
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
    config: &SearchConfig,
) -> Option<(StrategyKind, Arrangement)> {
    best_factored_arrangement(box_dims, box_count, pallet, config)
        .map(|arrangement| (StrategyKind::ColumnPacker, arrangement))
}

fn flexible_search(
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
    config: &SearchConfig,
) -> Option<(StrategyKind, Arrangement)> {
    try_flexible_arrangement(box_dims, box_count, pallet, config.flexible_bound)
        .map(|arrangement| (StrategyKind::FlexibleSearch, arrangement))
}

fn smart_patterns(
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
    _config: &SearchConfig,
) -> Option<(StrategyKind, Arrangement)> {
    try_smart_patterns(box_dims, box_count, pallet)
        .map(|(kind, arrangement)| (StrategyKind::Pattern(kind), arrangement))
}

pub struct Solver {
    box_dims: BoxDims,
    pallet: Pallet,
    config: SearchConfig,
}

impl Solver {
    pub fn new(box_dims: BoxDims, pallet: Pallet, config: SearchConfig) -> Self {
        Self {
            box_dims,
            pallet,
            config,
        }
    }

    pub fn box_dims(&self) -> &BoxDims {
        &self.box_dims
    }

    pub fn pallet(&self) -> &Pallet {
        &self.pallet
    }

    /// Arranges exactly `box_count` boxes on the pallet, or `None` if no stage
    /// of the search can.
    pub fn solve(&self, box_count: usize) -> Option<Solution> {
        if box_count == 0 {
            return None;
        }
        let area_bound = theoretical_max(&self.box_dims, &self.pallet);
        if box_count > area_bound {
            tracing::debug!(box_count, area_bound, "more boxes than the pallet area holds");
            return None;
        }

        for strategy in STRATEGY_CHAIN {
            let Some((kind, arrangement)) =
                strategy(&self.box_dims, box_count, &self.pallet, &self.config)
            else {
                continue;
            };

            // Every stage promises this; nothing leaves the solver without it.
            if arrangement.placed_count() != box_count
                || !fits_in_pallet(&arrangement, &self.box_dims, &self.pallet)
            {
                tracing::warn!(strategy = %kind, box_count, "discarding invalid arrangement");
                continue;
            }

            tracing::info!(
                strategy = %kind,
                shape = %arrangement.shape(),
                box_count,
                "arrangement found"
            );
            return Some(Solution {
                arrangement,
                box_dims: self.box_dims,
                pallet: self.pallet,
                strategy: kind,
            });
        }

        tracing::debug!(box_count, pallet = %self.pallet, "no arrangement found");
        None
    }
}
