use crate::types::{Pallet, Placement};

const MAX_WIDTH: f64 = 80.0;
const MAX_HEIGHT: f64 = 40.0;

/// Draws the pallet outline and every placed box, labelled `N` or `R`. The
/// pallet width runs left to right and its length top to bottom.
pub fn render_layout(pallet: &Pallet, placements: &[Placement]) -> String {
    let scale = f64::min(MAX_WIDTH / pallet.width, MAX_HEIGHT / pallet.length);
    if !scale.is_finite() {
        return String::new();
    }
    let grid_w = (pallet.width * scale).round() as usize;
    let grid_h = (pallet.length * scale).round() as usize;

    if grid_w == 0 || grid_h == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; grid_w + 1]; grid_h + 1];

    draw_rect(&mut grid, 0, 0, grid_w, grid_h);

    for p in placements {
        let sx = (p.x * scale).round() as usize;
        let sy = (p.y * scale).round() as usize;
        let sw = (p.width * scale).round() as usize;
        let sh = (p.length * scale).round() as usize;

        if sw == 0 || sh == 0 {
            continue;
        }

        draw_rect(&mut grid, sx, sy, sw, sh);

        // Label only boxes with an interior to hold it.
        if sw >= 2 && sh >= 2 {
            let cx = sx + sw / 2;
            let cy = sy + sh / 2;
            if cy < grid.len() && cx < grid[cy].len() {
                grid[cy][cx] = p.orientation.symbol();
            }
        }
    }

    let mut result = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

/// Writes an edge character, turning crossings into `+`.
fn put(grid: &mut [Vec<char>], x: usize, y: usize, edge: char) {
    let Some(cell) = grid.get_mut(y).and_then(|row| row.get_mut(x)) else {
        return;
    };
    *cell = match (*cell, edge) {
        ('+', _) => '+',
        ('|', '-') | ('-', '|') => '+',
        _ => edge,
    };
}

fn draw_rect(grid: &mut [Vec<char>], x: usize, y: usize, w: usize, h: usize) {
    for i in x..=x + w {
        put(grid, i, y, '-');
        put(grid, i, y + h, '-');
    }
    for j in y..=y + h {
        put(grid, x, j, '|');
        put(grid, x + w, j, '|');
    }
    for (cx, cy) in [(x, y), (x + w, y), (x, y + h), (x + w, y + h)] {
        put(grid, cx, cy, '+');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Arrangement, BoxDims, Orientation};

    #[test]
    fn test_render_empty_pallet() {
        let output = render_layout(&Pallet::new(40.0, 40.0), &[]);
        let lines: Vec<&str> = output.lines().collect();
        // 40x40 scales to a 40 by 40 canvas plus the closing edges.
        assert_eq!(lines.len(), 41);
        assert_eq!(lines[0], format!("+{}+", "-".repeat(39)));
        assert_eq!(lines[20], format!("|{}|", " ".repeat(39)));
        assert_eq!(lines[40], lines[0]);
    }

    #[test]
    fn test_render_labels_orientation() {
        let pallet = Pallet::new(40.0, 40.0);
        let placements = vec![
            Placement {
                x: 0.0,
                y: 0.0,
                width: 10.0,
                length: 20.0,
                orientation: Orientation::Normal,
            },
            Placement {
                x: 10.0,
                y: 0.0,
                width: 20.0,
                length: 10.0,
                orientation: Orientation::Rotated,
            },
        ];
        let output = render_layout(&pallet, &placements);
        let lines: Vec<Vec<char>> = output.lines().map(|l| l.chars().collect()).collect();
        assert_eq!(lines[10][5], 'N');
        assert_eq!(lines[5][20], 'R');
        // Shared edge between the two boxes meets the top border.
        assert_eq!(lines[0][10], '+');
        assert_eq!(lines[15][10], '|');
        assert_eq!(lines[10][10], '+');
    }

    #[test]
    fn test_render_arrangement_layout() {
        let b = BoxDims::new(8.0, 10.0);
        let arr: Arrangement = "N N\nR R\n".parse().unwrap();
        let output = render_layout(&Pallet::default(), &arr.placements(&b));
        assert_eq!(output.matches('N').count(), 2);
        assert_eq!(output.matches('R').count(), 2);
        assert!(output.lines().all(|l| l.chars().count() <= 81));
        assert!(output.lines().count() <= 41);
    }

    #[test]
    fn test_render_degenerate_pallet() {
        assert_eq!(render_layout(&Pallet::new(0.0, 48.0), &[]), "");
    }
}
