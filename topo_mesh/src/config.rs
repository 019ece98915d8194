//! Defaults applied to construction requests that leave fields out.

use serde::{Deserialize, Serialize};

use crate::elevation::DecimalSeparator;

pub const DEFAULT_RADIUS_MM: f64 = 3000.0;
pub const DEFAULT_BBOX_OFFSET_MM: f64 = 1000.0;
pub const DEFAULT_MESH_NAME: &str = "TopoMesh";

/// Panel defaults, optionally loaded from a JSON file next to the add-on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PanelConfig {
    /// Match radius in millimeters.
    pub radius: f64,
    /// Boundary margin in millimeters.
    pub bbox_offset: f64,
    pub separator: DecimalSeparator,
    pub mesh_name: String,
    /// Label unit multiplier, applied together with `mm_factor`.
    pub m_factor: i32,
    pub mm_factor: i32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS_MM,
            bbox_offset: DEFAULT_BBOX_OFFSET_MM,
            separator: DecimalSeparator::Point,
            mesh_name: DEFAULT_MESH_NAME.to_string(),
            m_factor: 1,
            mm_factor: 1000,
        }
    }
}

impl PanelConfig {
    /// Loads panel defaults from a JSON file. Missing keys keep their
    /// built-in values.
    pub fn from_json(path: &str) -> std::io::Result<Self> {
        let data = crate::io::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Millimeters per label unit.
    pub fn unit_scale(&self) -> f64 {
        f64::from(self.m_factor) * f64::from(self.mm_factor)
    }
}
