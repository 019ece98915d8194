//! Basic 3D point type used throughout the crate.

use super::Point;

/// Representation of a 3D point.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Planar projection of the point.
    pub fn xy(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Returns the point with its elevation shifted by `dz`.
    pub fn lowered(&self, dz: f64) -> Self {
        Self::new(self.x, self.y, self.z - dz)
    }
}
