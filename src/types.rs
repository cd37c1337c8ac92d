use serde::{Deserialize, Deserializer, Serialize};

use crate::geometry::{self, Footprint};

pub const STANDARD_PALLET_WIDTH: f64 = 40.0;
pub const STANDARD_PALLET_LENGTH: f64 = 48.0;

/// A box to be placed. `width` is always the shorter side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxDims {
    pub width: f64,
    pub length: f64,
}

impl BoxDims {
    /// Builds a box, swapping the sides if `width > length`.
    pub fn new(width: f64, length: f64) -> Self {
        if width > length {
            Self {
                width: length,
                length: width,
            }
        } else {
            Self { width, length }
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.length
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.length / self.width
    }

    /// Space taken across the pallet width when placed in `orientation`.
    pub fn across(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Normal => self.width,
            Orientation::Rotated => self.length,
        }
    }

    /// Space taken along a column (pallet length axis) when placed in `orientation`.
    pub fn along(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Normal => self.length,
            Orientation::Rotated => self.width,
        }
    }
}

impl std::fmt::Display for BoxDims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.length)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pallet {
    pub width: f64,
    pub length: f64,
}

impl Pallet {
    pub fn new(width: f64, length: f64) -> Self {
        Self { width, length }
    }

    pub fn area(&self) -> f64 {
        self.width * self.length
    }

    pub fn is_standard(&self) -> bool {
        self.width == STANDARD_PALLET_WIDTH && self.length == STANDARD_PALLET_LENGTH
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            length: self.length * factor,
        }
    }
}

impl Default for Pallet {
    fn default() -> Self {
        Self::new(STANDARD_PALLET_WIDTH, STANDARD_PALLET_LENGTH)
    }
}

impl std::fmt::Display for Pallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.length)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Length runs along the column.
    Normal,
    /// Length runs across the pallet.
    Rotated,
}

impl Orientation {
    pub fn symbol(self) -> char {
        match self {
            Orientation::Normal => 'N',
            Orientation::Rotated => 'R',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    Normal,
    Rotated,
    #[default]
    Empty,
}

impl Cell {
    pub fn orientation(self) -> Option<Orientation> {
        match self {
            Cell::Normal => Some(Orientation::Normal),
            Cell::Rotated => Some(Orientation::Rotated),
            Cell::Empty => None,
        }
    }

    pub fn is_placed(self) -> bool {
        self != Cell::Empty
    }

    pub fn symbol(self) -> char {
        self.orientation().map_or('O', Orientation::symbol)
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'N' => Some(Cell::Normal),
            'R' => Some(Cell::Rotated),
            'O' => Some(Cell::Empty),
            _ => None,
        }
    }
}

impl From<Orientation> for Cell {
    fn from(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Normal => Cell::Normal,
            Orientation::Rotated => Cell::Rotated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub columns: usize,
}

impl GridShape {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    pub fn cells(&self) -> usize {
        self.rows * self.columns
    }
}

impl std::fmt::Display for GridShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

/// Row-major grid of cells. Boxes stack down each column; columns sit side by
/// side across the pallet width.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arrangement {
    cells: Vec<Vec<Cell>>,
    columns: usize,
}

impl Arrangement {
    pub fn empty(shape: GridShape) -> Self {
        Self {
            cells: vec![vec![Cell::Empty; shape.columns]; shape.rows],
            columns: shape.columns,
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn shape(&self) -> GridShape {
        GridShape::new(self.rows(), self.columns)
    }

    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().map(move |row| row[col])
    }

    #[cfg(test)]
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    pub fn placed_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| c.is_placed())
            .count()
    }

    /// One `N R O` string per row.
    pub fn row_strings(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|c| c.symbol().to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    /// Physical positions of every placed box. Columns are laid left to right,
    /// each as wide as its widest box; boxes stack from the top of a column and
    /// empty cells take no space.
    pub fn placements(&self, box_dims: &BoxDims) -> Vec<Placement> {
        let mut placements = Vec::with_capacity(self.placed_count());
        let mut x = 0.0;
        for col in 0..self.columns {
            let mut y = 0.0;
            for orientation in self.column(col).filter_map(Cell::orientation) {
                let width = box_dims.across(orientation);
                let length = box_dims.along(orientation);
                placements.push(Placement {
                    x,
                    y,
                    width,
                    length,
                    orientation,
                });
                y += length;
            }
            x += geometry::column_width(self, col, box_dims);
        }
        placements
    }
}

impl std::fmt::Display for Arrangement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in self.row_strings() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Arrangement {
    type Err = String;

    /// Parses whitespace-separated `N`/`R`/`O` symbols, one row per line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.split_whitespace()
                    .map(|sym| {
                        let mut chars = sym.chars();
                        match (chars.next().and_then(Cell::from_symbol), chars.next()) {
                            (Some(cell), None) => Ok(cell),
                            _ => Err(format!("invalid cell '{}'", sym)),
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let columns = cells.first().map_or(0, Vec::len);
        if cells.iter().any(|row| row.len() != columns) {
            return Err("rows have differing lengths".to_string());
        }
        Ok(Self { cells, columns })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub length: f64,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    MixedColumn,
    Block,
    RatioBlend,
    Alternating,
    Perimeter,
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PatternKind::MixedColumn => "mixed-column",
            PatternKind::Block => "block",
            PatternKind::RatioBlend => "ratio-blended fill",
            PatternKind::Alternating => "alternating catalogue",
            PatternKind::Perimeter => "perimeter fill",
        };
        f.write_str(name)
    }
}

/// Which search stage produced an arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "pattern")]
pub enum StrategyKind {
    ColumnPacker,
    FlexibleSearch,
    Pattern(PatternKind),
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::ColumnPacker => f.write_str("column packer"),
            StrategyKind::FlexibleSearch => f.write_str("flexible placement"),
            StrategyKind::Pattern(kind) => write!(f, "{} pattern", kind),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Solution {
    pub arrangement: Arrangement,
    pub box_dims: BoxDims,
    pub pallet: Pallet,
    pub strategy: StrategyKind,
}

impl Solution {
    pub fn count(&self) -> usize {
        self.arrangement.placed_count()
    }

    pub fn rows(&self) -> usize {
        self.arrangement.rows()
    }

    pub fn columns(&self) -> usize {
        self.arrangement.columns()
    }

    pub fn footprint(&self) -> Footprint {
        geometry::footprint(&self.arrangement, &self.box_dims)
    }

    pub fn efficiency(&self) -> f64 {
        geometry::area_efficiency(&self.arrangement, &self.box_dims)
    }

    pub fn placements(&self) -> Vec<Placement> {
        self.arrangement.placements(&self.box_dims)
    }
}

/// Accepts an optional count written as a JSON integer or an integral float
/// (`24.0`).
pub fn deserialize_optional_count<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        Some(n) => count_from_f64(n).map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn count_from_f64(n: f64) -> Result<usize, String> {
    if !n.is_finite() || n < 0.0 || n.fract() != 0.0 || n > u32::MAX as f64 {
        return Err(format!("expected a non-negative whole number, got {}", n));
    }
    Ok(n as usize)
}
