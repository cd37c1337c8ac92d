use crate::config::SearchConfig;
use crate::geometry::theoretical_max;
use crate::solver::Solver;
use crate::types::{BoxDims, Pallet, Solution};

/// Auto-optimization never tries more boxes than this.
const MAX_AUTO_COUNT: usize = 100;

/// Finds the largest box count the solver can arrange on its pallet. Counts
/// from a quarter of the area bound up are tried, largest first; the pallet is
/// never scaled.
pub fn auto_optimize_box_count(solver: &Solver) -> Option<Solution> {
    let theoretical = theoretical_max(solver.box_dims(), solver.pallet());
    if theoretical == 0 {
        tracing::debug!("box larger than pallet by area");
        return None;
    }
    // Counts above the area bound cannot fit.
    let upper = (theoretical * 2).min(MAX_AUTO_COUNT).min(theoretical);
    let lower = (theoretical / 4).max(1).min(upper);
    tracing::debug!(theoretical, lower, upper, "searching box counts");

    (lower..=upper).rev().find_map(|count| {
        let solution = solver.solve(count);
        if solution.is_none() {
            tracing::debug!(count, "count does not fit");
        }
        solution
    })
}

/// Solves on `base`, growing both pallet sides step by step until the boxes
/// fit in an arrangement at least as tall (in rows) as it is wide.
pub fn solve_with_scaling(
    box_dims: &BoxDims,
    box_count: usize,
    base: &Pallet,
    config: &SearchConfig,
) -> Option<Solution> {
    for factor in config.scale_factors() {
        let pallet = base.scale(factor);
        match Solver::new(*box_dims, pallet, *config).solve(box_count) {
            Some(solution) if solution.rows() >= solution.columns() => {
                tracing::debug!(factor, %pallet, "scaled pallet fits");
                return Some(solution);
            }
            Some(solution) => {
                tracing::debug!(
                    factor,
                    rows = solution.rows(),
                    columns = solution.columns(),
                    "rejecting arrangement wider than tall"
                );
            }
            None => tracing::debug!(factor, %pallet, "scaled pallet too small"),
        }
    }
    None
}
