//! 2D rasterisation on top of a single-cell `set`.

use std::ops::RangeInclusive;

use tcanvas_domain::{Brush, Cell, Point};

use crate::core::transform::Transform;

/// Drawing primitives for anything that can paint one cell at a time.
///
/// Positions live in drawing space and go through the optional transform
/// before they are snapped to a cell. Cells outside the target are the
/// implementor's business; [`crate::Canvas`] clips them.
pub trait Geometry2D {
    fn set(&mut self, pos: Point, transform: Option<&dyn Transform>, brush: &Brush);

    fn transform_position(&self, pos: Point, transform: Option<&dyn Transform>) -> Cell {
        transform.map_or(pos, |t| t.apply(pos)).round()
    }

    /// The DDA indices of a `steps`-long walk from `from` to `to` that can
    /// land on the target, or `None` when none can. Defaults to every index.
    fn visible_steps(&self, _from: Cell, _to: Cell, steps: u64) -> Option<RangeInclusive<u64>> {
        Some(0..=steps)
    }

    /// Draws a line between two positions.
    ///
    /// The number of steps is the longer axis of the transformed endpoint
    /// cells; the walk itself happens in drawing space so that curved
    /// transforms bend the line.
    fn line(
        &mut self,
        pos0: impl Into<Point>,
        pos1: impl Into<Point>,
        transform: Option<&dyn Transform>,
        brush: &Brush,
    ) where
        Self: Sized,
    {
        let (pos0, pos1) = (pos0.into(), pos1.into());
        let cell0 = self.transform_position(pos0, transform);
        let cell1 = self.transform_position(pos1, transform);
        let steps = cell0.steps_to(cell1);

        if steps == 0 {
            self.set(pos0, transform, brush);
            return;
        }
        let Some(range) = self.visible_steps(cell0, cell1, steps) else {
            return;
        };
        for pos in interpolate(pos0, pos1, steps, range) {
            self.set(pos, transform, brush);
        }
    }

    /// Draws a triangle. The fill sweeps lines from the first edge
    /// (`pos0` to `pos1`) towards `pos2`.
    fn triangle(
        &mut self,
        pos0: impl Into<Point>,
        pos1: impl Into<Point>,
        pos2: impl Into<Point>,
        transform: Option<&dyn Transform>,
        fill: bool,
        brush: &Brush,
    ) where
        Self: Sized,
    {
        let (pos0, pos1, pos2) = (pos0.into(), pos1.into(), pos2.into());
        let cell0 = self.transform_position(pos0, transform);
        let cell1 = self.transform_position(pos1, transform);
        let cell2 = self.transform_position(pos2, transform);

        self.line(Point::from(cell0), Point::from(cell1), None, brush);
        self.line(Point::from(cell1), Point::from(cell2), None, brush);
        self.line(Point::from(cell0), Point::from(cell2), None, brush);

        if !fill {
            return;
        }
        // The edge endpoints were covered by the outline.
        let steps = cell0.steps_to(cell1);
        if steps >= 2 {
            for pos in interpolate(pos0, pos1, steps, 1..steps) {
                self.line(pos, pos2, transform, brush);
            }
        }
    }

    /// Draws a closed polygon. Filling fans triangles out from the vertex
    /// centroid, which only covers convex-ish shapes correctly.
    fn polygon(
        &mut self,
        vertices: &[Point],
        transform: Option<&dyn Transform>,
        fill: bool,
        brush: &Brush,
    ) where
        Self: Sized,
    {
        let Some(&last) = vertices.last() else {
            return;
        };

        if fill {
            #[allow(clippy::cast_precision_loss)]
            let count = vertices.len() as f64;
            let (sx, sy) = vertices
                .iter()
                .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
            let centre = Point::new(sx / count, sy / count);
            let mut prev = last;
            for &vertex in vertices {
                self.triangle(centre, prev, vertex, transform, true, brush);
                prev = vertex;
            }
        } else {
            let mut prev = last;
            for &vertex in vertices {
                self.line(prev, vertex, transform, brush);
                prev = vertex;
            }
        }
    }

    /// Draws the axis-aligned rectangle spanned by two corners.
    fn rectangle(
        &mut self,
        pos0: impl Into<Point>,
        pos1: impl Into<Point>,
        transform: Option<&dyn Transform>,
        fill: bool,
        brush: &Brush,
    ) where
        Self: Sized,
    {
        let (Point { x: x0, y: y0 }, Point { x: x1, y: y1 }) = (pos0.into(), pos1.into());
        self.polygon(
            &[
                Point::new(x0, y0),
                Point::new(x0, y1),
                Point::new(x1, y1),
                Point::new(x1, y0),
            ],
            transform,
            fill,
            brush,
        );
    }
}

/// Evenly spaced positions from `from` towards `to`, `steps` segments in
/// total, yielding the indices in `range`.
fn interpolate(
    from: Point,
    to: Point,
    steps: u64,
    range: impl Iterator<Item = u64>,
) -> impl Iterator<Item = Point> {
    #[allow(clippy::cast_precision_loss)]
    let n = steps as f64;
    let dx = (to.x - from.x) / n;
    let dy = (to.y - from.y) / n;
    range.map(move |i| {
        #[allow(clippy::cast_precision_loss)]
        let i = i as f64;
        Point::new(from.x + dx * i, from.y + dy * i)
    })
}
