use crate::candidates::generate_candidates;
use crate::config::SearchConfig;
use crate::geometry::{EPSILON, arrangement_area, fits_in_pallet, ratio_score};
use crate::types::{Arrangement, BoxDims, Cell, GridShape, Pallet};

/// Fills `shape` column by column, spreading the remaining boxes evenly over
/// the remaining columns. Within a column boxes start Normal and the bottom
/// ones are rotated until the column fits the pallet length; if even an
/// all-rotated column is too tall the column takes fewer boxes and the rest of
/// it stays empty.
///
/// Returns `None` if the shape cannot hold exactly `box_count` boxes on the
/// pallet.
pub fn try_arrangement(
    shape: GridShape,
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
) -> Option<Arrangement> {
    if shape.rows == 0 || shape.columns == 0 {
        return None;
    }

    let mut arrangement = Arrangement::empty(shape);
    let mut placed = 0;
    // Even all rotated, no column stacks past this.
    let max_stack =
        (((pallet.length + EPSILON) / box_dims.width).floor() as usize).saturating_add(1);

    for col in 0..shape.columns {
        let remaining_boxes = box_count - placed;
        let remaining_columns = shape.columns - col;
        let quota = remaining_boxes.div_ceil(remaining_columns).min(shape.rows);
        let tallest = quota.min(max_stack);
        if quota == 0 {
            continue;
        }

        let Some((count, rotated)) = (1..=tallest)
            .rev()
            .find_map(|n| fit_column(n, box_dims, pallet.length).map(|r| (n, r)))
        else {
            tracing::debug!(%shape, col, "not even one box fits in column");
            return None;
        };

        if count < quota {
            tracing::debug!(%shape, col, quota, count, "column shortened to fit pallet length");
        }

        for row in 0..count {
            let cell = if row < count - rotated {
                Cell::Normal
            } else {
                Cell::Rotated
            };
            arrangement.set(row, col, cell);
        }
        placed += count;
    }

    if placed != box_count {
        tracing::debug!(%shape, placed, box_count, "shape cannot hold every box");
        return None;
    }

    // Column heights were checked above; total width was not.
    if !fits_in_pallet(&arrangement, box_dims, pallet) {
        tracing::debug!(%shape, "arrangement too wide for pallet");
        return None;
    }

    Some(arrangement)
}

/// Smallest number of rotated boxes that lets `count` boxes fit in
/// `max_height`.
fn fit_column(count: usize, box_dims: &BoxDims, max_height: f64) -> Option<usize> {
    (0..=count).find(|&rotated| {
        let height = (count - rotated) as f64 * box_dims.length + rotated as f64 * box_dims.width;
        height <= max_height + EPSILON
    })
}

/// Runs the column packer over every candidate shape and keeps the smallest
/// occupied area, breaking near-equal areas by ratio score.
pub fn best_factored_arrangement(
    box_dims: &BoxDims,
    box_count: usize,
    pallet: &Pallet,
    config: &SearchConfig,
) -> Option<Arrangement> {
    let mut best: Option<(Arrangement, f64, f64)> = None;

    for shape in generate_candidates(box_count, config) {
        let Some(arrangement) = try_arrangement(shape, box_dims, box_count, pallet) else {
            tracing::debug!(%shape, "column packer failed");
            continue;
        };

        let area = arrangement_area(&arrangement, box_dims);
        let score = ratio_score(shape.rows, shape.columns, config.target_ratio);
        tracing::debug!(%shape, area, "column packer succeeded");

        let better = match &best {
            None => true,
            Some((_, best_area, best_score)) => {
                area < *best_area - EPSILON
                    || ((area - best_area).abs() < EPSILON && score < *best_score)
            }
        };
        if better {
            best = Some((arrangement, area, score));
        }
    }

    best.map(|(arrangement, _, _)| arrangement)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_complete(arr: &Arrangement, box_dims: &BoxDims, pallet: &Pallet, count: usize) {
        assert_eq!(arr.placed_count(), count, "wrong box count in\n{arr}");
        assert!(fits_in_pallet(arr, box_dims, pallet), "does not fit {pallet}:\n{arr}");
    }

    #[test]
    fn test_two_by_two() {
        let b = BoxDims::new(10.0, 20.0);
        let pallet = Pallet::new(50.0, 50.0);
        let arr = try_arrangement(GridShape::new(2, 2), &b, 4, &pallet).unwrap();
        assert_complete(&arr, &b, &pallet, 4);
        assert_eq!(arr.to_string(), "N N\nN N\n");
    }

    #[test]
    fn test_hundred_boxes_do_not_fit() {
        let b = BoxDims::new(10.0, 20.0);
        let pallet = Pallet::new(50.0, 50.0);
        assert!(try_arrangement(GridShape::new(10, 10), &b, 100, &pallet).is_none());
    }

    #[test]
    fn test_bottom_boxes_rotate_to_fit_height() {
        // Five normal boxes would be 50 tall; rotating the last brings it to 48.
        let b = BoxDims::new(8.0, 10.0);
        let pallet = Pallet::default();
        let arr = try_arrangement(GridShape::new(5, 4), &b, 20, &pallet).unwrap();
        assert_complete(&arr, &b, &pallet, 20);
        for col in 0..4 {
            let cells: Vec<Cell> = arr.column(col).collect();
            assert_eq!(
                cells,
                vec![
                    Cell::Normal,
                    Cell::Normal,
                    Cell::Normal,
                    Cell::Normal,
                    Cell::Rotated,
                ]
            );
        }
    }

    #[test]
    fn test_full_rotation_when_no_mixed_split_fits() {
        // Six boxes: each rotation saves only 2, so nothing short of all six
        // rotated (48) fits.
        let b = BoxDims::new(8.0, 10.0);
        let pallet = Pallet::default();
        let arr = try_arrangement(GridShape::new(6, 4), &b, 24, &pallet).unwrap();
        assert_complete(&arr, &b, &pallet, 24);
        for col in 0..4 {
            assert!(arr.column(col).all(|c| c == Cell::Rotated), "column {col}:\n{arr}");
        }
    }

    #[test]
    fn test_fit_column_smallest_rotation_count() {
        let b = BoxDims::new(8.0, 10.0);
        assert_eq!(fit_column(4, &b, 48.0), Some(0));
        assert_eq!(fit_column(5, &b, 48.0), Some(1));
        assert_eq!(fit_column(6, &b, 48.0), Some(6));
        assert_eq!(fit_column(7, &b, 48.0), None);
    }

    #[test]
    fn test_column_shrinks_and_pads_with_empty() {
        // 10x10 boxes: only four fit in a 48 long column.
        let b = BoxDims::new(10.0, 10.0);
        let pallet = Pallet::default();
        assert!(try_arrangement(GridShape::new(7, 1), &b, 7, &pallet).is_none());

        let arr = try_arrangement(GridShape::new(5, 2), &b, 8, &pallet).unwrap();
        assert_complete(&arr, &b, &pallet, 8);
        assert_eq!(arr.get(4, 0), Cell::Empty);
        assert_eq!(arr.get(4, 1), Cell::Empty);
    }

    #[test]
    fn test_uneven_count_spreads_over_columns() {
        let b = BoxDims::new(5.0, 8.0);
        let pallet = Pallet::default();
        let arr = try_arrangement(GridShape::new(3, 3), &b, 7, &pallet).unwrap();
        assert_complete(&arr, &b, &pallet, 7);
        let per_column: Vec<usize> = (0..3)
            .map(|c| arr.column(c).filter(|cell| cell.is_placed()).count())
            .collect();
        assert_eq!(per_column, vec![3, 2, 2]);
    }

    #[test]
    fn test_too_wide_is_rejected() {
        // Rotation satisfies the height but the box is wider than the pallet.
        let b = BoxDims::new(41.0, 50.0);
        let pallet = Pallet::default();
        assert!(try_arrangement(GridShape::new(1, 1), &b, 1, &pallet).is_none());
    }

    #[test]
    fn test_degenerate_shape() {
        let b = BoxDims::new(5.0, 8.0);
        let pallet = Pallet::default();
        assert!(try_arrangement(GridShape::new(0, 3), &b, 1, &pallet).is_none());
    }

    #[test]
    fn test_small_and_large_boxes_on_standard_pallet() {
        let pallet = Pallet::default();

        let small = BoxDims::new(5.0, 8.0);
        let arr = try_arrangement(GridShape::new(5, 4), &small, 20, &pallet).unwrap();
        assert_complete(&arr, &small, &pallet, 20);

        let large = BoxDims::new(15.0, 30.0);
        let arr = try_arrangement(GridShape::new(2, 1), &large, 2, &pallet).unwrap();
        assert_complete(&arr, &large, &pallet, 2);
    }

    #[test]
    fn test_best_factored_prefers_smallest_area() {
        let b = BoxDims::new(8.0, 10.0);
        let pallet = Pallet::default();
        let config = SearchConfig::default();
        let arr = best_factored_arrangement(&b, 24, &pallet, &config).unwrap();
        assert_eq!(arr.shape(), GridShape::new(6, 4));
        assert_complete(&arr, &b, &pallet, 24);
    }

    #[test]
    fn test_best_factored_area_tie_goes_to_ratio() {
        // 12 unit boxes: 4x3 and 6x2 both cover 12 units, 4x3 is closer to 6:5.
        let b = BoxDims::new(1.0, 1.0);
        let pallet = Pallet::new(100.0, 100.0);
        let config = SearchConfig::default();
        let arr = best_factored_arrangement(&b, 12, &pallet, &config).unwrap();
        assert_eq!(arr.shape(), GridShape::new(4, 3));
    }

    #[test]
    fn test_best_factored_none_when_nothing_fits() {
        let b = BoxDims::new(41.0, 50.0);
        let config = SearchConfig::default();
        assert!(best_factored_arrangement(&b, 1, &Pallet::default(), &config).is_none());
    }
}
