//! Read-only listings used by the panel to fill its selectors and preview a
//! label.

use log::warn;
use serde::Serialize;

use crate::store::{LayerId, ModelStore};

/// Shown when the selected layer carries no text.
pub const NO_SAMPLE_TEXT: &str = "(no text found on layer)";

/// One row of a selector listing. `index` is the dense 0-based position of
/// the row, not the host's own index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    pub name: String,
    pub index: i32,
}

fn dense<I>(names: I) -> Vec<ListEntry>
where
    I: IntoIterator<Item = String>,
{
    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| ListEntry {
            name,
            index: i as i32,
        })
        .collect()
}

/// Layers in host order.
pub fn list_layers<S: ModelStore>(store: &S) -> Vec<ListEntry> {
    match store.layers() {
        Ok(layers) => dense(layers.into_iter().map(|l| l.name)),
        Err(e) => {
            warn!("cannot list layers: {e}");
            Vec::new()
        }
    }
}

/// Stories in host order.
pub fn list_stories<S: ModelStore>(store: &S) -> Vec<ListEntry> {
    match store.stories() {
        Ok(stories) => dense(stories.into_iter().map(|s| s.name)),
        Err(e) => {
            warn!("cannot list stories: {e}");
            Vec::new()
        }
    }
}

/// Text of the first non-empty label on the layer at position `layer_idx`.
pub fn sample_label_text<S: ModelStore>(store: &S, layer_idx: i32) -> String {
    let Some(layer) = resolve_layer(store, layer_idx) else {
        return NO_SAMPLE_TEXT.to_string();
    };
    match store.labels(layer) {
        Ok(labels) => labels
            .into_iter()
            .map(|l| l.text)
            .find(|t| !t.is_empty())
            .unwrap_or_else(|| NO_SAMPLE_TEXT.to_string()),
        Err(e) => {
            warn!("cannot read labels: {e}");
            NO_SAMPLE_TEXT.to_string()
        }
    }
}

/// Maps a listing position onto the host layer it names.
pub fn resolve_layer<S: ModelStore>(store: &S, layer_idx: i32) -> Option<LayerId> {
    let idx = usize::try_from(layer_idx).ok()?;
    store.layers().ok()?.get(idx).map(|l| l.id)
}

/// Renders a listing as a JSON array of `{"name", "index"}` objects.
pub fn entries_to_json(entries: &[ListEntry]) -> String {
    serde_json::to_string(entries).unwrap_or_else(|_| "[]".to_string())
}
