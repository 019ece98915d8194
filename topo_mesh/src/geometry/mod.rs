//! Basic geometry primitives for topographic operations.

mod point;
mod point3;

pub use point::Point;
pub use point3::Point3;

/// Tolerance under which two planar coordinates are treated as coincident.
pub const COINCIDENT_TOL: f64 = 1e-6;

/// Squared planar distance, used where only ordering matters.
pub fn distance_sq(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Returns `true` when both coordinates of `a` and `b` differ by less than
/// [`COINCIDENT_TOL`].
pub fn coincident(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < COINCIDENT_TOL && (a.y - b.y).abs() < COINCIDENT_TOL
}

/// Axis-aligned rectangle on the XY plane.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Smallest rectangle enclosing all `points`, or `None` for an empty slice.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = Self {
            min: first,
            max: first,
        };
        for p in iter {
            rect.min.x = rect.min.x.min(p.x);
            rect.min.y = rect.min.y.min(p.y);
            rect.max.x = rect.max.x.max(p.x);
            rect.max.y = rect.max.y.max(p.y);
        }
        Some(rect)
    }

    /// Grows the rectangle by `margin` on all four sides.
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: Point::new(self.min.x - margin, self.min.y - margin),
            max: Point::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Corners in counter-clockwise order starting at the minimum corner.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }
}
