use serde::Serialize;

use crate::types::{Arrangement, BoxDims, Pallet};

/// Tolerance for dimension comparisons and area tie-breaks.
pub const EPSILON: f64 = 1e-6;

/// Physical extent of an arrangement: total column width by tallest column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Footprint {
    pub width: f64,
    pub length: f64,
}

impl Footprint {
    pub fn area(&self) -> f64 {
        self.width * self.length
    }

    pub fn fits_in(&self, pallet: &Pallet) -> bool {
        self.width <= pallet.width + EPSILON && self.length <= pallet.length + EPSILON
    }
}

/// Width of the widest placed box in `col`, 0 for an all-empty column.
pub fn column_width(arrangement: &Arrangement, col: usize, box_dims: &BoxDims) -> f64 {
    arrangement
        .column(col)
        .filter_map(|c| c.orientation())
        .map(|o| box_dims.across(o))
        .fold(0.0, f64::max)
}

pub fn column_height(arrangement: &Arrangement, col: usize, box_dims: &BoxDims) -> f64 {
    arrangement
        .column(col)
        .filter_map(|c| c.orientation())
        .map(|o| box_dims.along(o))
        .sum()
}

pub fn footprint(arrangement: &Arrangement, box_dims: &BoxDims) -> Footprint {
    (0..arrangement.columns()).fold(
        Footprint {
            width: 0.0,
            length: 0.0,
        },
        |acc, col| Footprint {
            width: acc.width + column_width(arrangement, col, box_dims),
            length: acc.length.max(column_height(arrangement, col, box_dims)),
        },
    )
}

/// The acceptance gate for every arrangement handed out of the search.
pub fn fits_in_pallet(arrangement: &Arrangement, box_dims: &BoxDims, pallet: &Pallet) -> bool {
    footprint(arrangement, box_dims).fits_in(pallet)
}

pub fn arrangement_area(arrangement: &Arrangement, box_dims: &BoxDims) -> f64 {
    footprint(arrangement, box_dims).area()
}

/// Placed box area over occupied bounding area, 0 when nothing is placed.
pub fn area_efficiency(arrangement: &Arrangement, box_dims: &BoxDims) -> f64 {
    let area = arrangement_area(arrangement, box_dims);
    if area <= 0.0 {
        return 0.0;
    }
    arrangement.placed_count() as f64 * box_dims.area() / area
}

/// Distance of `rows / columns` from the target ratio; lower is better.
pub fn ratio_score(rows: usize, columns: usize, target_ratio: f64) -> f64 {
    if columns == 0 {
        return f64::INFINITY;
    }
    (rows as f64 / columns as f64 - target_ratio).abs()
}

/// Boxes that fit on the pallet by area alone. No arrangement holds more.
pub fn theoretical_max(box_dims: &BoxDims, pallet: &Pallet) -> usize {
    let ratio = pallet.area() / box_dims.area();
    if !ratio.is_finite() || ratio <= 0.0 {
        return 0;
    }
    (ratio + EPSILON).floor() as usize
}
