use serde::{Deserialize, Serialize};

/// A position in drawing space. Drawing space is continuous; it is snapped
/// to a [`Cell`] only when a texel is painted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Snaps to the nearest cell, rounding halves away from zero. Values past
    /// the `i64` range saturate; NaN lands on zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn round(self) -> Cell {
        Cell::new(self.x.round() as i64, self.y.round() as i64)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self {
            x: f64::from(x),
            y: f64::from(y),
        }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

impl From<Cell> for Point {
    #[allow(clippy::cast_precision_loss)]
    fn from(cell: Cell) -> Self {
        Self {
            x: cell.column as f64,
            y: cell.row as f64,
        }
    }
}

/// Integer grid coordinates. May lie outside any particular canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub column: i64,
    pub row: i64,
}

impl Cell {
    #[must_use]
    pub const fn new(column: i64, row: i64) -> Self {
        Self { column, row }
    }

    /// Chebyshev distance: the number of DDA steps between two cells.
    #[must_use]
    pub fn steps_to(self, other: Cell) -> u64 {
        let dc = self.column.abs_diff(other.column);
        let dr = self.row.abs_diff(other.row);
        dc.max(dr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_halves_away_from_zero() {
        assert_eq!(Point::new(2.5, -2.5).round(), Cell::new(3, -3));
        assert_eq!(Point::new(2.4, 4.6).round(), Cell::new(2, 5));
    }

    #[test]
    fn steps_use_the_longer_axis() {
        assert_eq!(Cell::new(-1, 5).steps_to(Cell::new(10, -2)), 11);
        assert_eq!(Cell::new(3, 3).steps_to(Cell::new(3, 3)), 0);
    }

    #[test]
    fn steps_between_saturated_cells_do_not_overflow() {
        let far_left = Point::new(-1e300, 0.0).round();
        let far_right = Point::new(1e300, 0.0).round();
        assert_eq!(far_left, Cell::new(i64::MIN, 0));
        assert_eq!(far_left.steps_to(far_right), u64::MAX);
    }

    #[test]
    fn non_finite_points_are_flagged() {
        assert!(Point::new(1.0, -2.0).is_finite());
        assert!(!Point::new(f64::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f64::INFINITY).is_finite());
    }
}
