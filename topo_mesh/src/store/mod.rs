//! Access to the host document: layers, stories, drawing elements and mesh
//! creation.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::geometry::Point;
use crate::mesh::MeshGeometry;

pub mod memory;
pub use memory::{Element, MemoryStore};

/// Host attribute index of a layer. Indices are not guaranteed to be dense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub i32);

/// Identifier of an element created in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub u64);

/// A layer attribute as stored by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerAttr {
    pub id: LayerId,
    pub name: String,
}

/// A story (floor level) of the host document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// Host story index; negative for stories below ground.
    pub index: i32,
    pub name: String,
    /// Elevation of the story reference plane in meters.
    pub level: f64,
}

/// Text annotation anchor and content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub position: Point,
    pub text: String,
}

impl Label {
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }
}

/// Request to create a mesh element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMesh {
    pub name: String,
    pub layer: LayerId,
    /// Host index of the story the mesh is placed on.
    pub story: i32,
    pub geometry: MeshGeometry,
}

/// Element database of the host application.
///
/// Reads return elements in the order the host enumerates them. Mutations
/// must happen inside [`ModelStore::undoable`].
pub trait ModelStore {
    /// All layers in host order.
    fn layers(&self) -> Result<Vec<LayerAttr>, StoreError>;

    /// All stories in host order.
    fn stories(&self) -> Result<Vec<Story>, StoreError>;

    /// Centers of arcs and circles placed on `layer`.
    fn markers(&self, layer: LayerId) -> Result<Vec<Point>, StoreError>;

    /// Text elements placed on `layer`, including empty ones.
    fn labels(&self, layer: LayerId) -> Result<Vec<Label>, StoreError>;

    /// Creates a mesh element. Only valid inside an undoable command.
    fn create_mesh(&mut self, mesh: &NewMesh) -> Result<ElementId, StoreError>;

    /// Runs `command` as one named undo step. When the command fails every
    /// change it made is rolled back.
    fn undoable<T, F>(&mut self, name: &str, command: F) -> Result<T, StoreError>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T, StoreError>;
}
