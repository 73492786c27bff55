//! Display defaults applied to newly created proxies

use crate::representation::{DisplayMode, Material};
use scenecrate_core::{Color, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Initial presentation of mesh proxies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshDefaults {
    pub color: Color,
    pub material: Material,
    /// Draw triangle edges
    pub show_edges: bool,
    /// Draw mesh nodes
    pub show_nodes: bool,
    pub display_mode: DisplayMode,
}

impl Default for MeshDefaults {
    fn default() -> Self {
        Self {
            color: Color::GRAY,
            material: Material::Plastic,
            show_edges: false,
            show_nodes: false,
            display_mode: DisplayMode::Shaded,
        }
    }
}

/// Initial presentation of B-rep shape proxies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeDefaults {
    pub color: Color,
    pub material: Material,
    /// Percentage, 0 is opaque
    pub transparency: i32,
    pub display_mode: DisplayMode,
}

impl Default for ShapeDefaults {
    fn default() -> Self {
        Self {
            color: Color::GRAY,
            material: Material::Plastic,
            transparency: 0,
            display_mode: DisplayMode::Shaded,
        }
    }
}

/// Display defaults for every proxy kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayDefaults {
    pub mesh: MeshDefaults,
    pub shape: ShapeDefaults,
}

impl DisplayDefaults {
    /// Parse defaults from JSON; missing fields keep their default value
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read defaults from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let defaults = Self::from_json_str(&json)?;
        info!("Loaded display defaults from {}", path.display());
        Ok(defaults)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let defaults = DisplayDefaults::from_json_str(
            r#"{ "shape": { "transparency": 30, "material": "Gold" } }"#,
        )
        .unwrap();
        assert_eq!(defaults.shape.transparency, 30);
        assert_eq!(defaults.shape.material, Material::Gold);
        assert_eq!(defaults.shape.display_mode, DisplayMode::Shaded);
        assert_eq!(defaults.mesh, MeshDefaults::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut defaults = DisplayDefaults::default();
        defaults.mesh.show_edges = true;
        defaults.mesh.display_mode = DisplayMode::Wireframe;

        let json = defaults.to_json_string().unwrap();
        assert_eq!(DisplayDefaults::from_json_str(&json).unwrap(), defaults);
    }

    #[test]
    fn test_malformed_json_is_a_config_error() {
        let err = DisplayDefaults::from_json_str("{ mesh: ").unwrap_err();
        assert!(matches!(err, scenecrate_core::Error::Config(_)));
    }
}
