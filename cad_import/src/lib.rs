//! Loads the survey entities of an ASCII DXF drawing into a
//! [`MemoryStore`], so a mesh can be built from a drawing outside the host.

use std::io;

use log::{debug, info};
use topo_mesh::{
    geometry::Point,
    io::read_lines,
    store::{Element, Label, LayerId, MemoryStore},
};

/// Layer used by entities without a layer group.
pub const DEFAULT_LAYER: &str = "0";

/// Entity being collected from its group pairs.
#[derive(Debug, Default)]
struct Entity {
    kind: String,
    layer: Option<String>,
    x: Option<f64>,
    y: Option<f64>,
    radius: Option<f64>,
    text: String,
}

impl Entity {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            ..Self::default()
        }
    }

    fn set(&mut self, code: &str, value: &str) {
        let num = || value.trim().parse::<f64>().ok();
        match code {
            "8" => self.layer = Some(value.trim().to_string()),
            "10" => self.x = num(),
            "20" => self.y = num(),
            "40" => self.radius = num(),
            // MTEXT splits long strings into 3-groups ahead of the final 1-group
            "1" | "3" => self.text.push_str(value),
            _ => {}
        }
    }

    fn into_element(self, store: &mut MemoryStore) -> Option<Element> {
        let center = Point::new(self.x?, self.y?);
        let valid = match self.kind.as_str() {
            "CIRCLE" | "ARC" => self.radius.is_some_and(|r| r > 0.0),
            "TEXT" | "MTEXT" => true,
            _ => false,
        };
        if !valid {
            return None;
        }
        // layers only appear once something valid lands on them
        let layer = layer_for(store, self.layer.as_deref().unwrap_or(DEFAULT_LAYER));
        Some(match self.kind.as_str() {
            "CIRCLE" => Element::Circle { center, layer },
            "ARC" => Element::Arc { center, layer },
            _ => Element::Text {
                label: Label::new(center, self.text),
                layer,
            },
        })
    }
}

fn layer_for(store: &mut MemoryStore, name: &str) -> LayerId {
    match store.layer_by_name(name) {
        Some(id) => id,
        None => store.add_layer(name),
    }
}

fn is_supported(kind: &str) -> bool {
    matches!(kind, "CIRCLE" | "ARC" | "TEXT" | "MTEXT")
}

/// Reads circles, arcs and texts from the `ENTITIES` section of an ASCII DXF
/// file. Block definitions are not expanded. Layers are created in the order
/// they are first used and a single ground story is added.
pub fn read_dxf_store(path: &str) -> io::Result<MemoryStore> {
    let lines = read_lines(path)?;
    let mut store = MemoryStore::new();
    store.add_story(0, "Ground", 0.0);

    let mut section: Option<String> = None;
    let mut section_opened = false;
    let mut current: Option<Entity> = None;
    let mut skipped = 0usize;
    let mut iter = lines.iter();
    while let (Some(code), Some(value)) = (iter.next(), iter.next()) {
        let code = code.trim();
        if code != "0" {
            if section_opened && code == "2" {
                section = Some(value.trim().to_string());
                section_opened = false;
            } else if let Some(entity) = current.as_mut() {
                entity.set(code, value);
            }
            continue;
        }
        if let Some(entity) = current.take() {
            let kind = entity.kind.clone();
            match entity.into_element(&mut store) {
                Some(element) => {
                    store.add_element(element);
                }
                None => {
                    debug!("incomplete {kind} skipped");
                    skipped += 1;
                }
            }
        }
        match value.trim() {
            "SECTION" => {
                section = None;
                section_opened = true;
            }
            "ENDSEC" => section = None,
            kind if section.as_deref() == Some("ENTITIES") && is_supported(kind) => {
                current = Some(Entity::new(kind));
            }
            _ => {}
        }
    }
    if current.is_some() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "DXF ends inside an entity",
        ));
    }

    info!(
        "imported {} elements from {path} ({skipped} skipped)",
        store.elements().count()
    );
    Ok(store)
}
