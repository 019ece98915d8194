//! Construction parameters and their JSON request form.

use serde::Deserialize;

use crate::config::PanelConfig;
use crate::elevation::{DecimalSeparator, MM_PER_M};
use crate::error::ConstructionError;

/// Parameters of one mesh construction run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionParameters {
    /// Position of the source layer in the layer listing.
    pub layer_idx: i32,
    pub radius_mm: f64,
    pub separator: DecimalSeparator,
    /// Position of the story in the story listing; `None` picks a default.
    pub story_idx: Option<i32>,
    pub bbox_offset_mm: f64,
    pub mesh_name: String,
    /// Position of the target layer in the layer listing.
    pub mesh_layer_idx: i32,
    /// Millimeters per label unit.
    pub unit_scale: f64,
}

impl ConstructionParameters {
    /// Parameters for `layer_idx` with every other field at its default.
    pub fn new(layer_idx: i32) -> Self {
        Self::with_config(layer_idx, &PanelConfig::default())
    }

    fn with_config(layer_idx: i32, config: &PanelConfig) -> Self {
        Self {
            layer_idx,
            radius_mm: config.radius,
            separator: config.separator,
            story_idx: None,
            bbox_offset_mm: config.bbox_offset,
            mesh_name: config.mesh_name.clone(),
            mesh_layer_idx: 0,
            unit_scale: config.unit_scale(),
        }
    }

    /// Decodes a request payload using built-in defaults.
    pub fn from_json(payload: &str) -> Result<Self, ConstructionError> {
        Self::from_json_with(payload, &PanelConfig::default())
    }

    /// Decodes a request payload, filling absent keys from `config`.
    pub fn from_json_with(payload: &str, config: &PanelConfig) -> Result<Self, ConstructionError> {
        let req: Request = serde_json::from_str(payload)
            .map_err(|e| ConstructionError::InvalidParameter(format!("bad request: {e}")))?;

        let layer_idx = req
            .layer_idx
            .ok_or_else(|| ConstructionError::InvalidParameter("layerIdx is required".into()))?
            .to_int("layerIdx")?;
        let mut params = Self::with_config(layer_idx, config);

        if let Some(v) = req.radius {
            params.radius_mm = v.to_float("radius")?;
        }
        if let Some(sep) = req.separator {
            params.separator = DecimalSeparator::from_str(&sep).ok_or_else(|| {
                ConstructionError::InvalidParameter(format!("unsupported separator {sep:?}"))
            })?;
        }
        if let Some(v) = req.story_idx {
            params.story_idx = Some(v.to_int("storyIdx")?);
        }
        if let Some(v) = req.bbox_offset {
            params.bbox_offset_mm = v.to_float("bboxOffset")?;
        }
        if let Some(name) = req.mesh_name.filter(|n| !n.is_empty()) {
            params.mesh_name = name;
        }
        if let Some(v) = req.mesh_layer {
            params.mesh_layer_idx = v.to_int("meshLayer")?;
        }
        if req.m_factor.is_some() || req.mm_factor.is_some() {
            let m = match req.m_factor {
                Some(v) => v.to_int("mFactor")?,
                None => config.m_factor,
            };
            let mm = match req.mm_factor {
                Some(v) => v.to_int("mmFactor")?,
                None => config.mm_factor,
            };
            params.unit_scale = f64::from(m) * f64::from(mm);
        }
        Ok(params)
    }

    /// Match radius in host length units.
    pub fn radius(&self) -> f64 {
        self.radius_mm / MM_PER_M
    }

    /// Boundary margin in host length units.
    pub fn margin(&self) -> f64 {
        self.bbox_offset_mm / MM_PER_M
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Request {
    layer_idx: Option<Numeric>,
    radius: Option<Numeric>,
    separator: Option<String>,
    story_idx: Option<Numeric>,
    bbox_offset: Option<Numeric>,
    mesh_name: Option<String>,
    mesh_layer: Option<Numeric>,
    m_factor: Option<Numeric>,
    mm_factor: Option<Numeric>,
}

/// A number as sent by the panel: either a JSON number or the text of a form
/// field.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn to_float(&self, key: &str) -> Result<f64, ConstructionError> {
        let value = match self {
            Numeric::Number(v) => Some(*v),
            Numeric::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value
            .filter(|v| v.is_finite())
            .ok_or_else(|| ConstructionError::InvalidParameter(format!("{key} is not a number")))
    }

    fn to_int(&self, key: &str) -> Result<i32, ConstructionError> {
        let value = self.to_float(key)?;
        if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
            return Err(ConstructionError::InvalidParameter(format!(
                "{key} must be an integer, got {value}"
            )));
        }
        Ok(value as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        let p = ConstructionParameters::from_json(r#"{"layerIdx": 2}"#).unwrap();
        assert_eq!(p.layer_idx, 2);
        assert_eq!(p.radius_mm, 3000.0);
        assert_eq!(p.separator, DecimalSeparator::Point);
        assert_eq!(p.story_idx, None);
        assert_eq!(p.bbox_offset_mm, 1000.0);
        assert_eq!(p.mesh_name, "TopoMesh");
        assert_eq!(p.mesh_layer_idx, 0);
        assert_eq!(p.unit_scale, 1000.0);
        assert_eq!(p.radius(), 3.0);
        assert_eq!(p.margin(), 1.0);
    }

    #[test]
    fn full_request() {
        let p = ConstructionParameters::from_json(
            r#"{"layerIdx":"1","radius":1500,"separator":",","storyIdx":3,
                "bboxOffset":"250.5","meshName":"Site","meshLayer":4,"unused":true}"#,
        )
        .unwrap();
        assert_eq!(p.layer_idx, 1);
        assert_eq!(p.radius_mm, 1500.0);
        assert_eq!(p.separator, DecimalSeparator::Comma);
        assert_eq!(p.story_idx, Some(3));
        assert_eq!(p.bbox_offset_mm, 250.5);
        assert_eq!(p.mesh_name, "Site");
        assert_eq!(p.mesh_layer_idx, 4);
    }

    #[test]
    fn empty_name_falls_back() {
        let p = ConstructionParameters::from_json(r#"{"layerIdx":0,"meshName":""}"#).unwrap();
        assert_eq!(p.mesh_name, "TopoMesh");
    }

    #[test]
    fn unit_factors() {
        let p = ConstructionParameters::from_json(r#"{"layerIdx":0,"mmFactor":10}"#).unwrap();
        assert_eq!(p.unit_scale, 10.0);
    }

    #[test]
    fn rejects_bad_requests() {
        for bad in [
            "",
            "42",
            r#"{"radius": 10}"#,
            r#"{"layerIdx": "x"}"#,
            r#"{"layerIdx": 1.5}"#,
            r#"{"layerIdx": 0, "separator": ";"}"#,
        ] {
            assert!(
                matches!(
                    ConstructionParameters::from_json(bad),
                    Err(ConstructionError::InvalidParameter(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn config_overrides_defaults() {
        let config = PanelConfig {
            radius: 800.0,
            separator: DecimalSeparator::Comma,
            ..PanelConfig::default()
        };
        let p = ConstructionParameters::from_json_with(r#"{"layerIdx":0}"#, &config).unwrap();
        assert_eq!(p.radius_mm, 800.0);
        assert_eq!(p.separator, DecimalSeparator::Comma);
    }
}
