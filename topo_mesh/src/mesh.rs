//! Terrain mesh geometry in the shape the host mesh element expects.
//!
//! A mesh is a single closed rectangular contour around the surveyed points
//! plus a set of level points carrying the measured elevations. Elevations
//! are relative to the story the mesh is placed on.

use serde::Serialize;

use crate::error::BuildError;
use crate::geometry::{coincident, Point3, Rect};

/// Geometry of a terrain mesh element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshGeometry {
    /// Height of the mesh floor relative to the story.
    pub level: f64,
    /// Closed outer contour; the last vertex repeats the first.
    pub boundary: Vec<Point3>,
    /// Interior elevation samples.
    pub level_points: Vec<Point3>,
    /// End index of each contour in 1-based coordinate numbering, preceded by
    /// a leading zero.
    pub contour_ends: Vec<usize>,
}

impl MeshGeometry {
    /// Number of distinct boundary vertices.
    pub fn corner_count(&self) -> usize {
        self.boundary.len().saturating_sub(1)
    }

    pub fn contour_count(&self) -> usize {
        self.contour_ends.len().saturating_sub(1)
    }

    /// Total coordinates submitted to the host: the closed contour followed by
    /// the level points.
    pub fn coordinate_count(&self) -> usize {
        self.boundary.len() + self.level_points.len()
    }
}

/// Drops points that share a planar position with an earlier point.
pub fn dedup_points(points: &[Point3]) -> Vec<Point3> {
    let mut unique: Vec<Point3> = Vec::with_capacity(points.len());
    for p in points {
        if !unique.iter().any(|u| coincident(u.xy(), p.xy())) {
            unique.push(*p);
        }
    }
    unique
}

/// Builds mesh geometry from matched survey points.
///
/// `margin` grows the bounding rectangle on all sides; `story_elevation` is
/// subtracted from every z so the result is relative to the story.
pub fn build_mesh(
    points: &[Point3],
    margin: f64,
    story_elevation: f64,
) -> Result<MeshGeometry, BuildError> {
    let unique = dedup_points(points);
    if unique.len() < 3 {
        return Err(BuildError::InsufficientPoints {
            found: unique.len(),
        });
    }

    let rect = Rect::enclosing(unique.iter().map(Point3::xy))
        .ok_or(BuildError::InsufficientPoints { found: 0 })?
        .expanded(margin);
    let min_z = unique.iter().map(|p| p.z).fold(f64::INFINITY, f64::min);
    let level = min_z - story_elevation;

    let corners = rect.corners();
    let mut boundary: Vec<Point3> = corners
        .iter()
        .map(|c| Point3::new(c.x, c.y, level))
        .collect();
    boundary.push(boundary[0]);

    let level_points = unique.iter().map(|p| p.lowered(story_elevation)).collect();

    Ok(MeshGeometry {
        level,
        contour_ends: vec![0, boundary.len()],
        boundary,
        level_points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_point_example() {
        let pts = [
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(10.0, 0.0, 2.0),
            Point3::new(0.0, 10.0, 3.0),
        ];
        let mesh = build_mesh(&pts, 0.0, 0.5).unwrap();
        let expected = [
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (0.0, 0.0),
        ];
        assert_eq!(mesh.boundary.len(), 5);
        for (v, (x, y)) in mesh.boundary.iter().zip(expected) {
            assert_eq!((v.x, v.y), (x, y));
            assert!((v.z - 0.5).abs() < 1e-12);
        }
        let zs: Vec<f64> = mesh.level_points.iter().map(|p| p.z).collect();
        assert_eq!(zs, vec![0.5, 1.5, 2.5]);
        assert_eq!(mesh.contour_ends, vec![0, 5]);
        assert_eq!(mesh.contour_count(), 1);
        assert_eq!(mesh.corner_count(), 4);
        assert_eq!(mesh.coordinate_count(), 8);
        assert!((mesh.level - 0.5).abs() < 1e-12);
    }

    #[test]
    fn margin_expands_every_side() {
        let pts = [
            Point3::new(1.0, 2.0, 5.0),
            Point3::new(4.0, 2.0, 4.0),
            Point3::new(2.0, 6.0, 6.0),
        ];
        let mesh = build_mesh(&pts, 1.0, 0.0).unwrap();
        assert_eq!((mesh.boundary[0].x, mesh.boundary[0].y), (0.0, 1.0));
        assert_eq!((mesh.boundary[2].x, mesh.boundary[2].y), (5.0, 7.0));
        assert!(mesh.boundary.iter().all(|v| v.z == 4.0));
        assert_eq!(mesh.boundary.first(), mesh.boundary.last());
    }

    #[test]
    fn duplicates_collapse_first_wins() {
        let pts = [
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 5e-7, 9.0),
            Point3::new(3.0, 0.0, 2.0),
            Point3::new(0.0, 3.0, 3.0),
        ];
        let unique = dedup_points(&pts);
        assert_eq!(unique.len(), 3);
        assert_eq!(unique[0].z, 1.0);
        let mesh = build_mesh(&pts, 0.0, 0.0).unwrap();
        assert_eq!(mesh.level_points.len(), 3);
    }

    #[test]
    fn fewer_than_three_distinct_points_fail() {
        let pts = [
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(1.0, 1.0, 2.0),
            Point3::new(2.0, 2.0, 3.0),
        ];
        assert_eq!(
            build_mesh(&pts, 1.0, 0.0),
            Err(BuildError::InsufficientPoints { found: 2 })
        );
        assert_eq!(
            build_mesh(&[], 0.0, 0.0),
            Err(BuildError::InsufficientPoints { found: 0 })
        );
    }
}
