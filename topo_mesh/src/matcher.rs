//! Pairing of survey markers with their elevation labels.

use log::debug;

use crate::elevation::{parse_elevation_scaled, DecimalSeparator, MM_PER_M};
use crate::geometry::{distance_sq, Point, Point3};
use crate::store::Label;

/// Finds the label closest to `marker` whose squared distance does not exceed
/// `radius_sq`. Ties keep the label that comes first in `labels`.
pub fn nearest_label<'a>(marker: Point, labels: &'a [Label], radius_sq: f64) -> Option<&'a Label> {
    let mut best = None;
    let mut best_dist = f64::INFINITY;
    for label in labels {
        let d = distance_sq(marker, label.position);
        if d <= radius_sq && d < best_dist {
            best_dist = d;
            best = Some(label);
        }
    }
    best
}

/// Matches every marker with its nearest label within `radius` and reads the
/// label as an elevation in meters.
///
/// Markers without a label in range, or whose nearest label does not parse,
/// are skipped. The output keeps marker order and reuses marker coordinates
/// unchanged.
pub fn match_markers(
    markers: &[Point],
    labels: &[Label],
    radius: f64,
    separator: DecimalSeparator,
) -> Vec<Point3> {
    match_markers_scaled(markers, labels, radius, separator, MM_PER_M)
}

/// Same as [`match_markers`] with a custom label-to-millimeter `scale`.
pub fn match_markers_scaled(
    markers: &[Point],
    labels: &[Label],
    radius: f64,
    separator: DecimalSeparator,
    scale: f64,
) -> Vec<Point3> {
    let radius_sq = radius * radius;
    let mut result = Vec::with_capacity(markers.len());
    for &marker in markers {
        let Some(label) = nearest_label(marker, labels, radius_sq) else {
            debug!("marker at ({:.3}, {:.3}) has no label in range", marker.x, marker.y);
            continue;
        };
        match parse_elevation_scaled(&label.text, separator, scale) {
            Ok(mm) => result.push(Point3::new(marker.x, marker.y, mm / MM_PER_M)),
            Err(e) => debug!("skipping marker at ({:.3}, {:.3}): {e}", marker.x, marker.y),
        }
    }
    result
}
