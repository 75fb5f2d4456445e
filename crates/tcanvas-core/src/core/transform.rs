//! Mappings from drawing space onto canvas space.

use serde::Deserialize;
use tcanvas_domain::Point;

/// Maps a position before it is snapped to a cell.
pub trait Transform {
    fn apply(&self, point: Point) -> Point;
}

impl<F> Transform for F
where
    F: Fn(Point) -> Point,
{
    fn apply(&self, point: Point) -> Point {
        self(point)
    }
}

/// `x' = a·x + b·y + c`, `y' = d·x + e·y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

impl Affine {
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: 1.0,
            f: 0.0,
        }
    }

    #[must_use]
    pub const fn translate(dx: f64, dy: f64) -> Self {
        Self {
            c: dx,
            f: dy,
            ..Self::identity()
        }
    }

    #[must_use]
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            e: sy,
            ..Self::identity()
        }
    }

    /// Rotation about the origin. Canvas rows grow downwards, so positive
    /// angles turn clockwise on screen.
    #[must_use]
    pub fn rotate(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            a: cos,
            b: -sin,
            d: sin,
            e: cos,
            ..Self::identity()
        }
    }

    /// `self` first, then `next`.
    #[must_use]
    pub fn then(self, next: Affine) -> Self {
        Self {
            a: next.a * self.a + next.b * self.d,
            b: next.a * self.b + next.b * self.e,
            c: next.a * self.c + next.b * self.f + next.c,
            d: next.d * self.a + next.e * self.d,
            e: next.d * self.b + next.e * self.e,
            f: next.d * self.c + next.e * self.f + next.f,
        }
    }
}

impl Transform for Affine {
    fn apply(&self, point: Point) -> Point {
        Point::new(
            self.a * point.x + self.b * point.y + self.c,
            self.d * point.x + self.e * point.y + self.f,
        )
    }
}

/// Scene-file form of an [`Affine`]: scale, then rotate, then translate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformSpec {
    #[serde(default)]
    pub translate: Option<[f64; 2]>,
    #[serde(default)]
    pub scale: Option<[f64; 2]>,
    #[serde(default)]
    pub rotate: Option<f64>,
}

impl From<&TransformSpec> for Affine {
    fn from(spec: &TransformSpec) -> Self {
        let mut affine = Affine::identity();
        if let Some([sx, sy]) = spec.scale {
            affine = affine.then(Affine::scale(sx, sy));
        }
        if let Some(degrees) = spec.rotate {
            affine = affine.then(Affine::rotate(degrees));
        }
        if let Some([dx, dy]) = spec.translate {
            affine = affine.then(Affine::translate(dx, dy));
        }
        affine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn closures_are_transforms() {
        let shift = |p: Point| Point::new(p.x + 1.0, p.y);
        assert_eq!(shift.apply(Point::new(1.0, 2.0)), Point::new(2.0, 2.0));
    }

    #[test]
    fn composition_applies_in_order() {
        let affine = Affine::scale(2.0, 3.0).then(Affine::translate(1.0, -1.0));
        assert!(close(affine.apply(Point::new(1.0, 1.0)), Point::new(3.0, 2.0)));

        let reversed = Affine::translate(1.0, -1.0).then(Affine::scale(2.0, 3.0));
        assert!(close(reversed.apply(Point::new(1.0, 1.0)), Point::new(4.0, 0.0)));
    }

    #[test]
    fn quarter_turn() {
        let affine = Affine::rotate(90.0);
        assert!(close(affine.apply(Point::new(1.0, 0.0)), Point::new(0.0, 1.0)));
    }

    #[test]
    fn spec_scales_before_translating() {
        let spec = TransformSpec {
            translate: Some([10.0, 0.0]),
            scale: Some([2.0, 2.0]),
            rotate: None,
        };
        let affine = Affine::from(&spec);
        assert!(close(affine.apply(Point::new(1.0, 1.0)), Point::new(12.0, 2.0)));
    }
}
