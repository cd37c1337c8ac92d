use crate::geometry::{EPSILON, area_efficiency, column_width, fits_in_pallet};
use crate::types::{Arrangement, BoxDims, Cell, GridShape, Orientation, Pallet};

/// Neither grid dimension is searched past this, whatever the bound.
const MAX_FLEXIBLE_DIM: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPolicy {
    NormalFirst,
    RotatedFirst,
    AlternatingColumns,
    SpaceEfficiency,
}

impl FillPolicy {
    pub const ALL: [FillPolicy; 4] = [
        FillPolicy::NormalFirst,
        FillPolicy::RotatedFirst,
        FillPolicy::AlternatingColumns,
        FillPolicy::SpaceEfficiency,
    ];

    /// Fills empty cells of `grid` and returns how many boxes were placed.
    fn fill(
        self,
        grid: &mut Arrangement,
        box_dims: &BoxDims,
        box_count: usize,
        pallet: &Pallet,
    ) -> usize {
        use Orientation::{Normal, Rotated};
        match self {
            FillPolicy::NormalFirst => {
                fill_with_priority(grid, box_dims, box_count, [Normal, Rotated], pallet)
            }
            FillPolicy::RotatedFirst => {
                fill_with_priority(grid, box_dims, box_count, [Rotated, Normal], pallet)
            }
            FillPolicy::AlternatingColumns => {
                fill_alternating_columns(grid, box_dims, box_count, pallet)
            }
            FillPolicy::SpaceEfficiency => {
                fill_by_space_efficiency(grid, box_dims, box_count, pallet)
            }
        }
    }
}

/// Tries every grid up to `bound` with room for `box_count` boxes and returns
/// the fitting arrangement with the best area efficiency.
pub fn try_flexible_arrangement(
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
    bound: GridShape,
) -> Option<Arrangement> {
    let mut best: Option<(Arrangement, f64)> = None;

    tracing::debug!(%bound, "trying flexible placement");
    for rows in 1..=bound.rows.min(MAX_FLEXIBLE_DIM) {
        for columns in 1..=bound.columns.min(MAX_FLEXIBLE_DIM) {
            let shape = GridShape::new(rows, columns);
            if shape.cells() < box_count {
                continue;
            }

            let Some(arrangement) = try_flexible_placement(box_dims, box_count, pallet, shape)
            else {
                tracing::debug!(%shape, "flexible placement failed");
                continue;
            };

            let efficiency = area_efficiency(&arrangement, box_dims);
            tracing::debug!(%shape, efficiency, "flexible placement succeeded");
            if best.as_ref().is_none_or(|(_, e)| efficiency > *e) {
                best = Some((arrangement, efficiency));
            }
        }
    }

    best.map(|(arrangement, _)| arrangement)
}

/// First fill policy that places every box in `shape` and fits the pallet.
pub fn try_flexible_placement(
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
    shape: GridShape,
) -> Option<Arrangement> {
    FillPolicy::ALL.into_iter().find_map(|policy| {
        let mut grid = Arrangement::empty(shape);
        let placed = policy.fill(&mut grid, box_dims, box_count, pallet);
        (placed >= box_count && fits_in_pallet(&grid, box_dims, pallet)).then_some(grid)
    })
}

/// Sets `cell` at `(row, col)` if the grid still fits, otherwise leaves it empty.
fn place_if_fits(
    grid: &mut Arrangement,
    row: usize,
    col: usize,
    orientation: Orientation,
    box_dims: &BoxDims,
    pallet: &Pallet,
) -> bool {
    grid.set(row, col, orientation.into());
    if fits_in_pallet(grid, box_dims, pallet) {
        true
    } else {
        grid.set(row, col, Cell::Empty);
        false
    }
}

/// Scans columns top to bottom with the first orientation, then fills what is
/// left with the second.
fn fill_with_priority(
    grid: &mut Arrangement,
    box_dims: &BoxDims,
    box_count: usize,
    order: [Orientation; 2],
    pallet: &Pallet,
) -> usize {
    let mut placed = 0;
    for orientation in order {
        for col in 0..grid.columns() {
            for row in 0..grid.rows() {
                if placed >= box_count {
                    return placed;
                }
                if grid.get(row, col) == Cell::Empty
                    && place_if_fits(grid, row, col, orientation, box_dims, pallet)
                {
                    placed += 1;
                }
            }
        }
    }
    placed
}

/// Even columns Normal, odd columns Rotated. A column stops at its first box
/// that does not fit.
fn fill_alternating_columns(
    grid: &mut Arrangement,
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
) -> usize {
    let mut placed = 0;
    for col in 0..grid.columns() {
        let orientation = if col % 2 == 0 {
            Orientation::Normal
        } else {
            Orientation::Rotated
        };
        placed += fill_column(grid, col, orientation, box_count - placed, box_dims, pallet);
    }
    placed
}

/// Picks one orientation per column from the pallet width still free to the
/// right of the previous columns. When both fit the rotated, shorter stacking
/// orientation wins; a column with no room is skipped.
fn fill_by_space_efficiency(
    grid: &mut Arrangement,
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
) -> usize {
    let mut placed = 0;
    for col in 0..grid.columns() {
        let used: f64 = (0..col).map(|c| column_width(grid, c, box_dims)).sum();
        let remaining_width = pallet.width - used;

        let orientation = if remaining_width + EPSILON >= box_dims.length {
            if box_dims.width < box_dims.length {
                Orientation::Rotated
            } else {
                Orientation::Normal
            }
        } else if remaining_width + EPSILON >= box_dims.width {
            Orientation::Normal
        } else {
            continue;
        };

        placed += fill_column(grid, col, orientation, box_count - placed, box_dims, pallet);
    }
    placed
}

/// Stacks up to `limit` boxes down `col`, stopping at the first that does not fit.
fn fill_column(
    grid: &mut Arrangement,
    col: usize,
    orientation: Orientation,
    limit: usize,
    box_dims: &BoxDims,
    pallet: &Pallet,
) -> usize {
    let mut placed = 0;
    for row in 0..grid.rows() {
        if placed >= limit || !place_if_fits(grid, row, col, orientation, box_dims, pallet) {
            break;
        }
        placed += 1;
    }
    placed
}
