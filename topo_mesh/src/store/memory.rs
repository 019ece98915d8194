use log::debug;

use super::{ElementId, Label, LayerAttr, LayerId, ModelStore, NewMesh, Story};
use crate::error::StoreError;
use crate::geometry::Point;

/// Error code reported when an operation is not allowed in the current state.
pub const ERR_BAD_STATE: i32 = -2;
/// Error code reported for references to missing attributes.
pub const ERR_BAD_INDEX: i32 = -3;

/// Drawing element kept by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Arcs and circles mark survey positions by their center.
    Arc { center: Point, layer: LayerId },
    Circle { center: Point, layer: LayerId },
    Text {
        label: Label,
        layer: LayerId,
    },
    Mesh(NewMesh),
}

impl Element {
    pub fn layer(&self) -> LayerId {
        match self {
            Element::Arc { layer, .. }
            | Element::Circle { layer, .. }
            | Element::Text { layer, .. } => *layer,
            Element::Mesh(mesh) => mesh.layer,
        }
    }
}

/// Simple in-memory host document.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    layers: Vec<LayerAttr>,
    next_layer: i32,
    stories: Vec<Story>,
    elements: Vec<(ElementId, Element)>,
    next_element: u64,
    in_command: bool,
    undo_steps: Vec<String>,
    commands_opened: usize,
    reject_create: Option<StoreError>,
    offline: bool,
}

impl MemoryStore {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer and returns its attribute index.
    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        self.next_layer += 1;
        let id = LayerId(self.next_layer);
        self.layers.push(LayerAttr {
            id,
            name: name.into(),
        });
        id
    }

    /// Deletes a layer, leaving a gap in the attribute indices.
    pub fn delete_layer(&mut self, id: LayerId) -> bool {
        let len = self.layers.len();
        self.layers.retain(|l| l.id != id);
        len != self.layers.len()
    }

    /// Looks up a layer by name.
    pub fn layer_by_name(&self, name: &str) -> Option<LayerId> {
        self.layers.iter().find(|l| l.name == name).map(|l| l.id)
    }

    /// Adds a story with the given host index and reference elevation.
    pub fn add_story(&mut self, index: i32, name: impl Into<String>, level: f64) {
        self.stories.push(Story {
            index,
            name: name.into(),
            level,
        });
    }

    /// Adds a drawing element outside of any undo step, as an import would.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        self.next_element += 1;
        let id = ElementId(self.next_element);
        self.elements.push((id, element));
        id
    }

    pub fn add_circle(&mut self, layer: LayerId, center: Point) -> ElementId {
        self.add_element(Element::Circle { center, layer })
    }

    pub fn add_text(&mut self, layer: LayerId, position: Point, text: impl Into<String>) -> ElementId {
        self.add_element(Element::Text {
            label: Label::new(position, text),
            layer,
        })
    }

    /// Returns all elements with their IDs.
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements.iter().map(|(id, e)| (*id, e))
    }

    /// Returns all mesh elements.
    pub fn meshes(&self) -> Vec<&NewMesh> {
        self.elements
            .iter()
            .filter_map(|(_, e)| match e {
                Element::Mesh(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    /// Names of committed undo steps, oldest first.
    pub fn undo_steps(&self) -> &[String] {
        &self.undo_steps
    }

    /// Number of undoable commands started, including rolled back ones.
    pub fn commands_opened(&self) -> usize {
        self.commands_opened
    }

    /// Makes every subsequent mesh creation fail with `err`.
    pub fn reject_mesh_creation(&mut self, err: StoreError) {
        self.reject_create = Some(err);
    }

    /// Makes every read fail, as if the document were unavailable.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline {
            Err(StoreError::new(ERR_BAD_STATE, "document is not available"))
        } else {
            Ok(())
        }
    }

    fn on_layer(&self, layer: LayerId) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .map(|(_, e)| e)
            .filter(move |e| e.layer() == layer)
    }
}

impl ModelStore for MemoryStore {
    fn layers(&self) -> Result<Vec<LayerAttr>, StoreError> {
        self.check_online()?;
        Ok(self.layers.clone())
    }

    fn stories(&self) -> Result<Vec<Story>, StoreError> {
        self.check_online()?;
        Ok(self.stories.clone())
    }

    fn markers(&self, layer: LayerId) -> Result<Vec<Point>, StoreError> {
        self.check_online()?;
        Ok(self
            .on_layer(layer)
            .filter_map(|e| match e {
                Element::Arc { center, .. } | Element::Circle { center, .. } => Some(*center),
                _ => None,
            })
            .collect())
    }

    fn labels(&self, layer: LayerId) -> Result<Vec<Label>, StoreError> {
        self.check_online()?;
        Ok(self
            .on_layer(layer)
            .filter_map(|e| match e {
                Element::Text { label, .. } => Some(label.clone()),
                _ => None,
            })
            .collect())
    }

    fn create_mesh(&mut self, mesh: &NewMesh) -> Result<ElementId, StoreError> {
        if !self.in_command {
            return Err(StoreError::new(
                ERR_BAD_STATE,
                "element creation outside of an undoable command",
            ));
        }
        if let Some(err) = &self.reject_create {
            return Err(err.clone());
        }
        if !self.layers.iter().any(|l| l.id == mesh.layer) {
            return Err(StoreError::new(ERR_BAD_INDEX, "mesh layer does not exist"));
        }
        Ok(self.add_element(Element::Mesh(mesh.clone())))
    }

    fn undoable<T, F>(&mut self, name: &str, command: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Self) -> Result<T, StoreError>,
    {
        if self.in_command {
            return Err(StoreError::new(ERR_BAD_STATE, "undoable commands cannot nest"));
        }
        self.commands_opened += 1;
        let checkpoint = self.elements.len();
        let next_element = self.next_element;
        self.in_command = true;
        let result = command(self);
        self.in_command = false;
        match &result {
            Ok(_) => self.undo_steps.push(name.to_string()),
            Err(e) => {
                debug!("rolling back {name:?}: {e}");
                self.elements.truncate(checkpoint);
                self.next_element = next_element;
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3;
    use crate::mesh::build_mesh;

    fn sample_mesh(layer: LayerId) -> NewMesh {
        let geometry = build_mesh(
            &[
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            0.0,
            0.0,
        )
        .unwrap();
        NewMesh {
            name: "m".into(),
            layer,
            story: 0,
            geometry,
        }
    }

    #[test]
    fn layer_ids_stay_sparse_after_delete() {
        let mut store = MemoryStore::new();
        let a = store.add_layer("A");
        let b = store.add_layer("B");
        let c = store.add_layer("C");
        assert!(store.delete_layer(b));
        let ids: Vec<LayerId> = store.layers().unwrap().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![a, c]);
        assert_eq!(c, LayerId(3));
    }

    #[test]
    fn reads_filter_by_layer() {
        let mut store = MemoryStore::new();
        let a = store.add_layer("A");
        let b = store.add_layer("B");
        store.add_circle(a, Point::new(1.0, 1.0));
        store.add_element(Element::Arc {
            center: Point::new(2.0, 2.0),
            layer: a,
        });
        store.add_circle(b, Point::new(3.0, 3.0));
        store.add_text(a, Point::new(1.1, 1.0), "1.0");
        assert_eq!(store.markers(a).unwrap().len(), 2);
        assert_eq!(store.markers(b).unwrap(), vec![Point::new(3.0, 3.0)]);
        assert_eq!(store.labels(a).unwrap().len(), 1);
        assert!(store.labels(b).unwrap().is_empty());
    }

    #[test]
    fn create_requires_command() {
        let mut store = MemoryStore::new();
        let a = store.add_layer("A");
        let mesh = sample_mesh(a);
        assert!(store.create_mesh(&mesh).is_err());
        store.undoable("Create", |s| s.create_mesh(&mesh)).unwrap();
        assert_eq!(store.meshes().len(), 1);
        assert_eq!(store.undo_steps(), ["Create".to_string()]);
    }

    #[test]
    fn failed_command_rolls_back() {
        let mut store = MemoryStore::new();
        let a = store.add_layer("A");
        let mesh = sample_mesh(a);
        let result: Result<(), StoreError> = store.undoable("Create", |s| {
            s.create_mesh(&mesh)?;
            Err(StoreError::new(1, "later step failed"))
        });
        assert!(result.is_err());
        assert!(store.meshes().is_empty());
        assert!(store.undo_steps().is_empty());
        assert_eq!(store.commands_opened(), 1);
    }

    #[test]
    fn offline_reads_fail() {
        let mut store = MemoryStore::new();
        store.add_layer("A");
        store.set_offline(true);
        assert!(store.layers().is_err());
        assert!(store.stories().is_err());
    }
}
