//! Scene configuration model: the canonical, serializable description of
//! background, lighting, and scene objects.
//!
//! Every field carries a documented default so that a partial document is
//! repaired into a fully-populated config at the ingestion boundary. All
//! downstream code (controller, render binding) operates on total data and
//! never chases optional fields.

pub mod diff;
pub mod yaml;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::modulation::ModulationSpec;
use std::collections::BTreeMap;

/// Default color for the background and the default object material.
pub const DEFAULT_COLOR: &str = "#ff00ff";
const WHITE: &str = "#ffffff";

/// Root scene description. Object order is render/layer order and is
/// preserved through serialization round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub background: String,
    pub lighting: Lighting,
    pub objects: Vec<SceneObject>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background: DEFAULT_COLOR.to_string(),
            lighting: Lighting::default(),
            objects: vec![SceneObject::default()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Lighting {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientLight {
    pub color: String,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: WHITE.to_string(),
            intensity: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLight {
    pub color: String,
    pub intensity: f32,
    pub position: Vec3Config,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: WHITE.to_string(),
            intensity: 1.0,
            position: Vec3Config {
                x: 10.0,
                y: 20.0,
                z: 30.0,
            },
        }
    }
}

/// Plain (x, y, z) triple as it appears in documents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Vec3Config {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3Config {
    pub const ONE: Vec3Config = Vec3Config {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    pub fn to_vec3(self) -> glam::Vec3 {
        glam::Vec3::new(self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: Vec3Config,
    pub rotation: Vec3Config,
    pub scale: Vec3Config,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3Config::default(),
            rotation: Vec3Config::default(),
            scale: Vec3Config::ONE,
        }
    }
}

/// Named torus-knot geometry parameter. Declaration order is the stable
/// iteration order used for animation maps and diffs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum GeomParam {
    Radius,
    Tube,
    TubularSegments,
    RadialSegments,
    P,
    Q,
}

impl GeomParam {
    pub const ALL: [GeomParam; 6] = [
        GeomParam::Radius,
        GeomParam::Tube,
        GeomParam::TubularSegments,
        GeomParam::RadialSegments,
        GeomParam::P,
        GeomParam::Q,
    ];
}

/// Torus-knot construction parameters. Segment counts are positive
/// integers, the rest positive reals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TorusKnotParams {
    pub radius: f32,
    pub tube: f32,
    pub tubular_segments: u32,
    pub radial_segments: u32,
    pub p: f32,
    pub q: f32,
}

impl Default for TorusKnotParams {
    fn default() -> Self {
        Self {
            radius: 10.0,
            tube: 3.0,
            tubular_segments: 100,
            radial_segments: 16,
            p: 2.0,
            q: 3.0,
        }
    }
}

impl TorusKnotParams {
    pub fn value(&self, param: GeomParam) -> f32 {
        match param {
            GeomParam::Radius => self.radius,
            GeomParam::Tube => self.tube,
            GeomParam::TubularSegments => self.tubular_segments as f32,
            GeomParam::RadialSegments => self.radial_segments as f32,
            GeomParam::P => self.p,
            GeomParam::Q => self.q,
        }
    }

    /// Set a parameter from a (possibly modulated) real value. Segment
    /// counts round to the nearest integer with a floor of 3 to keep the
    /// mesh non-degenerate.
    pub fn set(&mut self, param: GeomParam, value: f32) {
        match param {
            GeomParam::Radius => self.radius = value,
            GeomParam::Tube => self.tube = value,
            GeomParam::TubularSegments => self.tubular_segments = round_segments(value),
            GeomParam::RadialSegments => self.radial_segments = round_segments(value),
            GeomParam::P => self.p = value,
            GeomParam::Q => self.q = value,
        }
    }
}

fn round_segments(value: f32) -> u32 {
    value.round().max(3.0) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialParams {
    pub color: String,
    pub metalness: f32,
    pub roughness: f32,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            metalness: 1.0,
            roughness: 0.0,
        }
    }
}

/// One scene object: identity, transform, geometry, material, and an
/// optional modulation spec per geometry parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneObject {
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub transform: Transform,
    pub geometry: TorusKnotParams,
    pub material: MaterialParams,
    pub animation: BTreeMap<GeomParam, ModulationSpec>,
}

impl Default for SceneObject {
    fn default() -> Self {
        Self {
            id: "obj-1".to_string(),
            name: "TorusKnot".to_string(),
            visible: true,
            transform: Transform::default(),
            geometry: TorusKnotParams::default(),
            material: MaterialParams::default(),
            animation: BTreeMap::new(),
        }
    }
}

impl SceneConfig {
    /// Repair a raw parsed document into a fully-populated config.
    ///
    /// Every recognized missing field is filled with its documented
    /// default; an empty or absent `objects` list synthesizes exactly one
    /// default object. Fails only when the top level is not a mapping or a
    /// present field carries an incompatible type (the latter is a
    /// deliberate rejection rather than a silent coercion).
    pub fn apply_defaults(raw: serde_yaml::Value) -> Result<SceneConfig, ConfigError> {
        if !raw.is_mapping() {
            return Err(ConfigError::InvalidDocument(
                "top-level document is not a mapping".to_string(),
            ));
        }

        let mut config: SceneConfig = serde_yaml::from_value(raw)
            .map_err(|e| ConfigError::InvalidDocument(e.to_string()))?;

        if config.objects.is_empty() {
            config.objects.push(SceneObject::default());
        }

        Ok(config)
    }
}

/// Parse a `#rrggbb` hex color into RGB components in [0, 1].
pub fn parse_hex_color(text: &str) -> Option<[f32; 3]> {
    let hex = text.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map(|v| v as f32 / 255.0)
    };
    Some([
        channel(0..2).ok()?,
        channel(2..4).ok()?,
        channel(4..6).ok()?,
    ])
}

/// Clamp a selection index into the valid range for `len` objects.
pub fn clamp_selection(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        index.min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_defaults_on_empty_mapping() {
        let raw = serde_yaml::from_str::<serde_yaml::Value>("{}").unwrap();
        let config = SceneConfig::apply_defaults(raw).unwrap();

        assert_eq!(config, SceneConfig::default());
        assert_eq!(config.background, "#ff00ff");
        assert_eq!(config.lighting.ambient.color, "#ffffff");
        assert_eq!(config.lighting.ambient.intensity, 0.5);
        assert_eq!(config.lighting.directional.intensity, 1.0);
        assert_eq!(
            config.lighting.directional.position,
            Vec3Config {
                x: 10.0,
                y: 20.0,
                z: 30.0
            }
        );

        assert_eq!(config.objects.len(), 1);
        let obj = &config.objects[0];
        assert_eq!(obj.id, "obj-1");
        assert_eq!(obj.name, "TorusKnot");
        assert!(obj.visible);
        assert_eq!(obj.transform, Transform::default());
        assert_eq!(obj.geometry, TorusKnotParams::default());
        assert_eq!(obj.material.color, "#ff00ff");
        assert_eq!(obj.material.metalness, 1.0);
        assert_eq!(obj.material.roughness, 0.0);
        assert!(obj.animation.is_empty());
    }

    #[test]
    fn test_apply_defaults_rejects_non_mapping() {
        for text in ["42", "[1, 2, 3]", "null", "just a string"] {
            let raw = serde_yaml::from_str::<serde_yaml::Value>(text).unwrap();
            assert!(matches!(
                SceneConfig::apply_defaults(raw),
                Err(ConfigError::InvalidDocument(_))
            ));
        }
    }

    #[test]
    fn test_apply_defaults_keeps_present_fields() {
        let raw = serde_yaml::from_str::<serde_yaml::Value>(
            "background: '#123456'\nlighting:\n  ambient:\n    intensity: 0.9",
        )
        .unwrap();
        let config = SceneConfig::apply_defaults(raw).unwrap();

        assert_eq!(config.background, "#123456");
        assert_eq!(config.lighting.ambient.intensity, 0.9);
        // Untouched siblings keep their defaults.
        assert_eq!(config.lighting.ambient.color, "#ffffff");
        assert_eq!(config.lighting.directional.intensity, 1.0);
    }

    #[test]
    fn test_apply_defaults_synthesizes_object_for_empty_list() {
        let raw = serde_yaml::from_str::<serde_yaml::Value>("objects: []").unwrap();
        let config = SceneConfig::apply_defaults(raw).unwrap();

        assert_eq!(config.objects, vec![SceneObject::default()]);
    }

    #[test]
    fn test_apply_defaults_fills_partial_object() {
        let raw = serde_yaml::from_str::<serde_yaml::Value>(
            "objects:\n  - id: knot-7\n    geometry:\n      radius: 4.5",
        )
        .unwrap();
        let config = SceneConfig::apply_defaults(raw).unwrap();

        let obj = &config.objects[0];
        assert_eq!(obj.id, "knot-7");
        assert_eq!(obj.geometry.radius, 4.5);
        assert_eq!(obj.geometry.tube, 3.0);
        assert_eq!(obj.geometry.tubular_segments, 100);
        assert!(obj.visible);
    }

    #[test]
    fn test_geometry_param_accessors_round_trip() {
        let mut geometry = TorusKnotParams::default();
        for param in GeomParam::ALL {
            let v = geometry.value(param);
            geometry.set(param, v);
        }
        assert_eq!(geometry, TorusKnotParams::default());
    }

    #[test]
    fn test_segment_counts_round_and_clamp() {
        let mut geometry = TorusKnotParams::default();

        geometry.set(GeomParam::TubularSegments, 64.7);
        assert_eq!(geometry.tubular_segments, 65);

        geometry.set(GeomParam::RadialSegments, 0.2);
        assert_eq!(geometry.radial_segments, 3);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff00ff"), Some([1.0, 0.0, 1.0]));
        assert_eq!(parse_hex_color("#000000"), Some([0.0, 0.0, 0.0]));

        let mid = parse_hex_color("#808080").unwrap();
        assert!((mid[0] - 128.0 / 255.0).abs() < 1e-6);

        assert_eq!(parse_hex_color("ff00ff"), None);
        assert_eq!(parse_hex_color("#ff00f"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
        assert_eq!(parse_hex_color(""), None);
    }

    #[test]
    fn test_clamp_selection() {
        assert_eq!(clamp_selection(0, 3), 0);
        assert_eq!(clamp_selection(2, 3), 2);
        assert_eq!(clamp_selection(9, 3), 2);
        assert_eq!(clamp_selection(5, 0), 0);
    }
}
