//! Turning a survey layer into a terrain mesh element.
//!
//! A run validates the request, collects markers and labels from the source
//! layer, matches them into 3D points, builds the mesh geometry and commits it
//! as a single undo step. Any failure leaves the document untouched.

use log::{error, info, warn};

use crate::elevation::{format_elevation, MM_PER_M};
use crate::error::{ConstructionError, StoreError};
use crate::matcher::match_markers_scaled;
use crate::mesh::{build_mesh, MeshGeometry};
use crate::params::ConstructionParameters;
use crate::store::{ElementId, LayerId, ModelStore, NewMesh, Story};

/// Name of the undo step that creates the mesh.
pub const UNDO_STEP_NAME: &str = "Create Topo Mesh";

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshReport {
    pub element: ElementId,
    pub markers: usize,
    pub labels: usize,
    pub matched: usize,
    pub geometry: MeshGeometry,
}

/// Host references a request resolved to.
#[derive(Debug, Clone, PartialEq)]
struct Targets {
    source: LayerId,
    target: LayerId,
    story: Story,
}

fn invalid(msg: impl Into<String>) -> ConstructionError {
    ConstructionError::InvalidParameter(msg.into())
}

/// Maps a failed document read, naming what was being read.
fn read_failed(what: &'static str) -> impl FnOnce(StoreError) -> ConstructionError {
    move |e| ConstructionError::StoreRejected {
        code: Some(e.code),
        message: format!("cannot read {what}: {}", e.message),
    }
}

fn layer_at(layers: &[LayerId], idx: i32, what: &str) -> Result<LayerId, ConstructionError> {
    usize::try_from(idx)
        .ok()
        .and_then(|i| layers.get(i).copied())
        .ok_or_else(|| invalid(format!("{what} {idx} does not exist")))
}

/// Picks the story a request refers to. Without a selection the first story
/// above ground is used, or the first story when none is above ground.
fn pick_story(stories: Vec<Story>, story_idx: Option<i32>) -> Result<Story, ConstructionError> {
    match story_idx {
        Some(idx) => usize::try_from(idx)
            .ok()
            .and_then(|i| stories.into_iter().nth(i))
            .ok_or_else(|| invalid(format!("story {idx} does not exist"))),
        None => {
            let fallback = stories.iter().position(|s| s.index > 0).unwrap_or(0);
            stories
                .into_iter()
                .nth(fallback)
                .ok_or_else(|| invalid("document has no stories"))
        }
    }
}

fn validate<S: ModelStore>(
    store: &S,
    params: &ConstructionParameters,
) -> Result<Targets, ConstructionError> {
    if !(params.radius_mm.is_finite() && params.radius_mm >= 0.0) {
        return Err(invalid(format!("radius {} must be non-negative", params.radius_mm)));
    }
    if !(params.bbox_offset_mm.is_finite() && params.bbox_offset_mm >= 0.0) {
        return Err(invalid(format!(
            "boundary margin {} must be non-negative",
            params.bbox_offset_mm
        )));
    }
    if !(params.unit_scale.is_finite() && params.unit_scale > 0.0) {
        return Err(invalid(format!("unit scale {} must be positive", params.unit_scale)));
    }

    let layers: Vec<LayerId> = store
        .layers()
        .map_err(read_failed("layers"))?
        .into_iter()
        .map(|l| l.id)
        .collect();
    let source = layer_at(&layers, params.layer_idx, "source layer")?;
    let target = layer_at(&layers, params.mesh_layer_idx, "mesh layer")?;
    let story = pick_story(
        store.stories().map_err(read_failed("stories"))?,
        params.story_idx,
    )?;
    Ok(Targets {
        source,
        target,
        story,
    })
}

/// Builds a terrain mesh from the survey layer named by `params` and adds it
/// to the document.
pub fn create_mesh<S: ModelStore>(
    store: &mut S,
    params: &ConstructionParameters,
) -> Result<MeshReport, ConstructionError> {
    let targets = validate(store, params)?;
    info!(
        "building {:?} from layer {:?} on story {:?} ({:.3} m)",
        params.mesh_name, targets.source, targets.story.name, targets.story.level
    );

    let markers = store
        .markers(targets.source)
        .map_err(read_failed("markers"))?;
    let mut labels = store
        .labels(targets.source)
        .map_err(read_failed("labels"))?;
    labels.retain(|l| !l.text.is_empty());
    info!("found {} markers and {} labels", markers.len(), labels.len());
    if markers.is_empty() {
        return Err(ConstructionError::NoMarkers);
    }
    if labels.is_empty() {
        return Err(ConstructionError::NoLabels);
    }

    let points = match_markers_scaled(
        &markers,
        &labels,
        params.radius(),
        params.separator,
        params.unit_scale,
    );
    info!("matched {} of {} markers", points.len(), markers.len());
    if points.len() < 3 {
        return Err(ConstructionError::InsufficientMatches {
            found: points.len(),
        });
    }

    let geometry = build_mesh(&points, params.margin(), targets.story.level)?;
    if geometry.level_points.len() < points.len() {
        warn!(
            "{} coincident points merged",
            points.len() - geometry.level_points.len()
        );
    }

    let mesh = NewMesh {
        name: params.mesh_name.clone(),
        layer: targets.target,
        story: targets.story.index,
        geometry,
    };
    let element = store.undoable(UNDO_STEP_NAME, |s| s.create_mesh(&mesh))?;
    info!(
        "created mesh {:?} at level {} m: {} corners, {} level points, {} coordinates",
        mesh.name,
        format_elevation(mesh.geometry.level * MM_PER_M, params.separator),
        mesh.geometry.corner_count(),
        mesh.geometry.level_points.len(),
        mesh.geometry.coordinate_count()
    );

    Ok(MeshReport {
        element,
        markers: markers.len(),
        labels: labels.len(),
        matched: points.len(),
        geometry: mesh.geometry,
    })
}

/// Writes the outcome of a run to the log.
pub fn log_outcome(result: &Result<MeshReport, ConstructionError>) {
    match result {
        Ok(report) => info!(
            "mesh {:?} done: {} of {} markers used",
            report.element, report.matched, report.markers
        ),
        Err(e) => error!("mesh was not created: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(index: i32) -> Story {
        Story {
            index,
            name: format!("S{index}"),
            level: f64::from(index) * 3.0,
        }
    }

    #[test]
    fn explicit_story_is_a_listing_position() {
        let stories = vec![story(-1), story(0), story(1)];
        assert_eq!(pick_story(stories.clone(), Some(0)).unwrap().index, -1);
        assert_eq!(pick_story(stories.clone(), Some(2)).unwrap().index, 1);
        assert!(pick_story(stories, Some(3)).is_err());
    }

    #[test]
    fn unset_story_prefers_first_above_ground() {
        assert_eq!(pick_story(vec![story(-1), story(0), story(1), story(2)], None).unwrap().index, 1);
        assert_eq!(pick_story(vec![story(-1), story(0)], None).unwrap().index, -1);
        assert!(pick_story(Vec::new(), None).is_err());
    }

    #[test]
    fn layer_lookup_rejects_out_of_range() {
        let layers = [LayerId(1), LayerId(4)];
        assert_eq!(layer_at(&layers, 1, "layer").unwrap(), LayerId(4));
        assert!(layer_at(&layers, 2, "layer").is_err());
        assert!(layer_at(&layers, -1, "layer").is_err());
    }
}
