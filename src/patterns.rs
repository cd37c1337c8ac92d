//! Hand-tuned fallback layouts, tried when the column packer and the flexible
//! search both come up empty.
//!
//! The catalogues below are heuristic tables; their exact contents and order
//! decide which arrangement is found, so they are kept as literal data.

use crate::geometry::{EPSILON, area_efficiency, fits_in_pallet};
use crate::types::Orientation::{self, Normal as N, Rotated as R};
use crate::types::{Arrangement, BoxDims, Cell, GridShape, Pallet, PatternKind};

/// Column sequences for the mixed-column family.
const MIXED_COLUMN_CATALOGUE: &[&[Orientation]] = &[
    &[R, N, N, R, R],
    &[R, N, N, R],
    &[R, N, R],
    &[N, R, N, R],
    &[R, R, N, N],
];

/// Column sequences for the alternating family.
const ALTERNATING_CATALOGUE: &[&[Orientation]] = &[
    &[R, N, R, N, R],
    &[N, R, N, R, N],
    &[R, N, R, N],
    &[N, R, N, R],
    &[R, N, R],
    &[N, R, N],
    &[R, R, N, N],
    &[N, N, R, R],
    &[R, R, N, R],
    &[N, R, R, N],
    &[R, N, N, R],
    &[R, N, R, R],
    &[N, R, N, N],
    &[R, N, R, N, R, N],
    &[R, R, N, N, R, R],
    &[N, R, N, R, N, R],
    &[R, R],
    &[N, N],
    &[R, N],
    &[N, R],
];

/// Share of Normal boxes, in tenths, for the ratio-blended family.
const NORMAL_SHARES_TENTHS: [usize; 7] = [2, 3, 4, 5, 6, 7, 8];

impl PatternKind {
    pub const ALL: [PatternKind; 5] = [
        PatternKind::MixedColumn,
        PatternKind::Block,
        PatternKind::RatioBlend,
        PatternKind::Alternating,
        PatternKind::Perimeter,
    ];

    pub fn try_fill(
        self,
        box_dims: &BoxDims,
        box_count: usize,
        pallet: &Pallet,
    ) -> Option<Arrangement> {
        match self {
            PatternKind::MixedColumn => try_mixed_column_pattern(box_dims, box_count, pallet),
            PatternKind::Block => try_block_pattern(box_dims, box_count, pallet),
            PatternKind::RatioBlend => try_ratio_blend_pattern(box_dims, box_count, pallet),
            PatternKind::Alternating => try_alternating_pattern(box_dims, box_count, pallet),
            PatternKind::Perimeter => try_perimeter_pattern(box_dims, box_count, pallet),
        }
    }
}

/// Tries each pattern family in order and returns the first that places
/// `box_count` boxes on the pallet.
pub fn try_smart_patterns(
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
) -> Option<(PatternKind, Arrangement)> {
    PatternKind::ALL.into_iter().find_map(|kind| {
        let arrangement = kind.try_fill(box_dims, box_count, pallet)?;
        tracing::debug!(pattern = %kind, shape = %arrangement.shape(), "pattern found");
        Some((kind, arrangement))
    })
}

/// How many boxes in `orientation` stack within the pallet length.
fn column_capacity(box_dims: &BoxDims, pallet: &Pallet, orientation: Orientation) -> usize {
    ((pallet.length + EPSILON) / box_dims.along(orientation)).floor() as usize
}

fn accept(
    grid: Arrangement,
    placed: usize,
    box_count: usize,
    box_dims: &BoxDims,
    pallet: &Pallet,
) -> Option<Arrangement> {
    (placed >= box_count && fits_in_pallet(&grid, box_dims, pallet)).then_some(grid)
}

/// Fills each column of `sequence` from the top with as many boxes of its
/// orientation as the pallet length and `rows` allow, stopping once
/// `box_count` boxes are placed.
fn fill_sequence(
    sequence: &[Orientation],
    rows: usize,
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
) -> (Arrangement, usize) {
    let mut grid = Arrangement::empty(GridShape::new(rows, sequence.len()));
    let mut placed = 0;
    for (col, &orientation) in sequence.iter().enumerate() {
        let take = column_capacity(box_dims, pallet, orientation)
            .min(rows)
            .min(box_count - placed);
        for row in 0..take {
            grid.set(row, col, orientation.into());
        }
        placed += take;
        if placed >= box_count {
            break;
        }
    }
    (grid, placed)
}

fn try_mixed_column_pattern(
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
) -> Option<Arrangement> {
    for sequence in MIXED_COLUMN_CATALOGUE {
        for rows in 5..=8 {
            let (grid, placed) = fill_sequence(sequence, rows, box_dims, box_count, pallet);
            if let Some(grid) = accept(grid, placed, box_count, box_dims, pallet) {
                return Some(grid);
            }
        }
    }
    None
}

/// A block of Normal boxes on the left and a block of Rotated boxes to its
/// right, each sized independently.
fn try_block_pattern(
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
) -> Option<Arrangement> {
    for n_rows in 1..=5 {
        for n_cols in 1..=3 {
            for r_rows in 1..=5 {
                for r_cols in 1..=3 {
                    let shape = GridShape::new(n_rows.max(r_rows), n_cols + r_cols);
                    let mut grid = Arrangement::empty(shape);
                    let mut placed = 0;

                    let blocks = [(N, n_rows, 0..n_cols), (R, r_rows, n_cols..n_cols + r_cols)];
                    for (orientation, block_rows, block_cols) in blocks {
                        for row in 0..block_rows {
                            for col in block_cols.clone() {
                                if placed < box_count {
                                    grid.set(row, col, orientation.into());
                                    placed += 1;
                                }
                            }
                        }
                    }

                    if let Some(grid) = accept(grid, placed, box_count, box_dims, pallet) {
                        return Some(grid);
                    }
                }
            }
        }
    }
    None
}

/// Fills grids row by row, steering the running share of Normal boxes toward
/// each target share in turn.
fn try_ratio_blend_pattern(
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
) -> Option<Arrangement> {
    for tenths in NORMAL_SHARES_TENTHS {
        let target_normal = box_count * tenths / 10;
        let target_rotated = box_count - target_normal;

        for rows in 4..=8 {
            for cols in 3..=7 {
                let shape = GridShape::new(rows, cols);
                if shape.cells() < box_count {
                    continue;
                }
                let (grid, placed) =
                    blend_fill(shape, box_count, tenths, target_normal, target_rotated);
                if let Some(grid) = accept(grid, placed, box_count, box_dims, pallet) {
                    return Some(grid);
                }
            }
        }
    }
    None
}

/// A cell goes Normal while Normal is short of its target and its running
/// share is strictly below `tenths / 10`. The share is compared in integers,
/// so a share exactly on target yields a Rotated box.
fn blend_fill(
    shape: GridShape,
    box_count: usize,
    tenths: usize,
    target_normal: usize,
    target_rotated: usize,
) -> (Arrangement, usize) {
    let mut grid = Arrangement::empty(shape);
    let (mut normal, mut rotated) = (0, 0);

    'fill: for row in 0..shape.rows {
        for col in 0..shape.columns {
            let placed = normal + rotated;
            if placed >= box_count {
                break 'fill;
            }
            let below_share = normal * 10 < tenths * placed.max(1);
            if normal < target_normal && (rotated >= target_rotated || below_share) {
                grid.set(row, col, Cell::Normal);
                normal += 1;
            } else if rotated < target_rotated {
                grid.set(row, col, Cell::Rotated);
                rotated += 1;
            } else {
                break 'fill;
            }
        }
    }
    (grid, normal + rotated)
}

/// Unlike the other families this scores the whole catalogue and keeps the
/// most boxes placed, then the best area efficiency.
fn try_alternating_pattern(
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
) -> Option<Arrangement> {
    let max_rotated = column_capacity(box_dims, pallet, R);
    let max_normal = column_capacity(box_dims, pallet, N);
    let rows = max_rotated.max(max_normal);
    tracing::debug!(max_rotated, max_normal, "trying alternating catalogue");

    let mut best: Option<(Arrangement, usize, f64)> = None;
    for sequence in ALTERNATING_CATALOGUE {
        let width: f64 = sequence.iter().map(|&o| box_dims.across(o)).sum();
        if width > pallet.width + EPSILON {
            continue;
        }
        let capacity: usize = sequence
            .iter()
            .map(|&o| column_capacity(box_dims, pallet, o))
            .sum();
        if capacity < box_count {
            continue;
        }

        let (grid, placed) = fill_sequence(sequence, rows, box_dims, box_count, pallet);
        let Some(grid) = accept(grid, placed, box_count, box_dims, pallet) else {
            continue;
        };

        let efficiency = area_efficiency(&grid, box_dims);
        let better = best.as_ref().is_none_or(|(_, best_placed, best_efficiency)| {
            placed > *best_placed || (placed == *best_placed && efficiency > *best_efficiency)
        });
        if better {
            best = Some((grid, placed, efficiency));
        }
    }
    best.map(|(grid, _, _)| grid)
}

fn try_perimeter_pattern(
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
) -> Option<Arrangement> {
    for rows in 5..=8 {
        for cols in 3..=6 {
            let shape = GridShape::new(rows, cols);
            if shape.cells() < box_count {
                continue;
            }
            let variants = [
                ring_first_fill(shape, box_dims, box_count, pallet),
                corner_first_fill(shape, box_dims, box_count, pallet),
            ];
            for grid in variants.into_iter().flatten() {
                if grid.placed_count() >= box_count && fits_in_pallet(&grid, box_dims, pallet) {
                    return Some(grid);
                }
            }
        }
    }
    None
}

/// First orientation, Normal then Rotated, that keeps the grid on the pallet
/// with a box at `(row, col)`. The grid is left as it was.
fn choose_orientation(
    grid: &mut Arrangement,
    row: usize,
    col: usize,
    box_dims: &BoxDims,
    pallet: &Pallet,
) -> Option<Orientation> {
    let previous = grid.get(row, col);
    let chosen = [N, R].into_iter().find(|&o| {
        grid.set(row, col, o.into());
        fits_in_pallet(grid, box_dims, pallet)
    });
    grid.set(row, col, previous);
    chosen
}

/// Places a box at `(row, col)` if one fits there; returns whether it did.
fn place_best_fit(
    grid: &mut Arrangement,
    row: usize,
    col: usize,
    box_dims: &BoxDims,
    pallet: &Pallet,
) -> bool {
    match choose_orientation(grid, row, col, box_dims, pallet) {
        Some(orientation) => {
            grid.set(row, col, orientation.into());
            true
        }
        None => false,
    }
}

/// Outer ring first (top and bottom rows, then the side columns), then inner
/// rings until enough boxes are placed.
fn ring_first_fill(
    shape: GridShape,
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
) -> Option<Arrangement> {
    let GridShape { rows, columns } = shape;
    let mut grid = Arrangement::empty(shape);
    let mut placed = 0;

    for col in 0..columns {
        for row in [0, rows - 1] {
            if placed < box_count && place_best_fit(&mut grid, row, col, box_dims, pallet) {
                placed += 1;
            }
        }
    }
    for row in 1..rows - 1 {
        for col in [0, columns - 1] {
            if placed < box_count && place_best_fit(&mut grid, row, col, box_dims, pallet) {
                placed += 1;
            }
        }
    }

    for layer in 1..(rows / 2).min(columns / 2) {
        for row in layer..rows - layer {
            for col in layer..columns - layer {
                let on_ring = row == layer
                    || row == rows - layer - 1
                    || col == layer
                    || col == columns - layer - 1;
                if on_ring
                    && grid.get(row, col) == Cell::Empty
                    && placed < box_count
                    && place_best_fit(&mut grid, row, col, box_dims, pallet)
                {
                    placed += 1;
                }
            }
        }
    }

    (placed >= box_count).then_some(grid)
}

/// Rotated boxes in the corners, Normal boxes along the edges, interior filled
/// with whichever orientation still fits.
fn corner_first_fill(
    shape: GridShape,
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
) -> Option<Arrangement> {
    let GridShape { rows, columns } = shape;
    let mut grid = Arrangement::empty(shape);
    let mut placed = 0;

    if rows > 1 && columns > 1 {
        for (row, col) in [(0, 0), (0, columns - 1), (rows - 1, 0), (rows - 1, columns - 1)] {
            if placed < box_count {
                grid.set(row, col, Cell::Rotated);
                placed += 1;
            }
        }
    }

    for row in 0..rows {
        for col in 0..columns {
            let on_edge = row == 0 || row == rows - 1 || col == 0 || col == columns - 1;
            if on_edge && grid.get(row, col) == Cell::Empty && placed < box_count {
                grid.set(row, col, Cell::Normal);
                placed += 1;
            }
        }
    }

    for row in 1..rows.saturating_sub(1) {
        for col in 1..columns.saturating_sub(1) {
            if grid.get(row, col) == Cell::Empty
                && placed < box_count
                && place_best_fit(&mut grid, row, col, box_dims, pallet)
            {
                placed += 1;
            }
        }
    }

    (placed >= box_count).then_some(grid)
}
