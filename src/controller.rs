//! Scene controller: typed commands and the single state-update function.
//!
//! Every UI action becomes a [`Command`] consumed by
//! [`SceneController::apply`], so state transitions are auditable and
//! testable without a live window. Only mutations that invalidate the
//! bound mesh (geometry edits, selection, document replacement) raise the
//! rebuild flag; appearance edits flow through the per-frame uniform
//! upload and must not reset the accumulated mesh orientation.

use crate::error::ConfigError;
use crate::modulation::{Band, ModulationSpec};
use crate::scene::diff::{diff, DiffEntry};
use crate::scene::{
    clamp_selection, parse_hex_color, yaml, GeomParam, SceneConfig, SceneObject, DEFAULT_COLOR,
};

/// A single user-facing state transition.
#[derive(Debug, Clone)]
pub enum Command {
    SetBackground(String),
    SetAmbientIntensity(f32),
    SetDirectionalIntensity(f32),
    SetObjectColor(String),
    SetMetalness(f32),
    SetRoughness(f32),
    SetGeometryParam(GeomParam, f32),
    SetModulationMin(GeomParam, f32),
    SetModulationMax(GeomParam, f32),
    ToggleBand(GeomParam, Band),
    SetVisible(bool),
    SelectObject(usize),
    ToggleRotation,
    ToggleScale,
    /// Replace the config from document text (lenient: defaults fill gaps).
    ImportDocument(String),
    /// Replace the config from document text, requiring the required
    /// top-level keys to be explicitly present.
    ApplyDocument(String),
}

/// Owns the live scene config, the selection, and the animation flags.
pub struct SceneController {
    config: SceneConfig,
    selected: usize,
    pub rotate_anim: bool,
    pub scale_anim: bool,
    needs_rebuild: bool,
}

impl SceneController {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            config,
            selected: 0,
            rotate_anim: true,
            scale_anim: true,
            needs_rebuild: true,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Replace the config wholesale (successful import path). The old
    /// config is discarded, never merged; selection re-clamps.
    pub fn set_config(&mut self, config: SceneConfig) {
        warn_document_colors(&config);
        self.config = config;
        self.selected = clamp_selection(self.selected, self.config.objects.len());
        self.needs_rebuild = true;
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_object(&self) -> &SceneObject {
        // apply_defaults guarantees at least one object and the selection
        // is clamped on every mutation.
        &self.config.objects[self.selected]
    }

    /// Consume the rebuild flag. The frame loop calls this before drawing
    /// so render resources are rebound in the same task as the mutation.
    pub fn take_rebuild(&mut self) -> bool {
        std::mem::take(&mut self.needs_rebuild)
    }

    pub fn export_yaml(&self) -> Result<String, ConfigError> {
        yaml::export(&self.config)
    }

    /// Diff the live config against a parsed-and-defaulted candidate
    /// document without applying it.
    pub fn diff_against(&self, text: &str) -> Result<Vec<DiffEntry>, ConfigError> {
        let candidate = yaml::import(text)?;
        Ok(diff(&self.config, &candidate))
    }

    /// Apply one command. On error the config is left untouched.
    pub fn apply(&mut self, command: Command) -> Result<(), ConfigError> {
        match command {
            Command::SetBackground(color) => {
                warn_unrecognized_color("background", &color);
                self.config.background = color;
            }
            Command::SetAmbientIntensity(intensity) => {
                self.config.lighting.ambient.intensity = intensity;
            }
            Command::SetDirectionalIntensity(intensity) => {
                self.config.lighting.directional.intensity = intensity;
            }
            Command::SetObjectColor(color) => {
                warn_unrecognized_color("material", &color);
                self.selected_object_mut().material.color = color;
            }
            Command::SetMetalness(metalness) => {
                self.selected_object_mut().material.metalness = metalness;
            }
            Command::SetRoughness(roughness) => {
                self.selected_object_mut().material.roughness = roughness;
            }
            Command::SetGeometryParam(param, value) => {
                self.selected_object_mut().geometry.set(param, value);
                self.needs_rebuild = true;
            }
            Command::SetModulationMin(param, value) => {
                self.modulation_entry(param).min = value;
            }
            Command::SetModulationMax(param, value) => {
                self.modulation_entry(param).max = value;
            }
            Command::ToggleBand(param, band) => {
                let spec = self.modulation_entry(param);
                if let Some(pos) = spec.bands.iter().position(|&b| b == band) {
                    spec.bands.remove(pos);
                } else {
                    spec.bands.push(band);
                }
            }
            Command::SetVisible(visible) => {
                self.selected_object_mut().visible = visible;
            }
            Command::SelectObject(index) => {
                self.selected = clamp_selection(index, self.config.objects.len());
                self.needs_rebuild = true;
            }
            Command::ToggleRotation => {
                self.rotate_anim = !self.rotate_anim;
            }
            Command::ToggleScale => {
                self.scale_anim = !self.scale_anim;
            }
            Command::ImportDocument(text) => {
                let config = yaml::import(&text)?;
                self.set_config(config);
            }
            Command::ApplyDocument(text) => {
                let config = yaml::import_strict(&text)?;
                self.set_config(config);
            }
        }
        Ok(())
    }

    fn selected_object_mut(&mut self) -> &mut SceneObject {
        &mut self.config.objects[self.selected]
    }

    /// Fetch or initialize the modulation spec for one geometry parameter.
    /// A fresh entry starts static: min = max = the parameter's current
    /// baseline, no active bands.
    fn modulation_entry(&mut self, param: GeomParam) -> &mut ModulationSpec {
        let selected = self.selected;
        let object = &mut self.config.objects[selected];
        let baseline = object.geometry.value(param);
        object.animation.entry(param).or_insert(ModulationSpec {
            min: baseline,
            max: baseline,
            bands: Vec::new(),
        })
    }
}

/// Unrecognized colors are kept in the document (export must stay
/// lossless) and render with the magenta fallback; the warning fires once
/// here at commit time, not per frame.
fn warn_unrecognized_color(field: &str, color: &str) {
    if parse_hex_color(color).is_none() {
        log::warn!(
            "unrecognized {} color {:?}, rendering falls back to {}",
            field,
            color,
            DEFAULT_COLOR
        );
    }
}

fn warn_document_colors(config: &SceneConfig) {
    warn_unrecognized_color("background", &config.background);
    warn_unrecognized_color("ambient light", &config.lighting.ambient.color);
    warn_unrecognized_color("directional light", &config.lighting.directional.color);
    for object in &config.objects {
        warn_unrecognized_color("material", &object.material.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> SceneController {
        SceneController::new(SceneConfig::default())
    }

    #[test]
    fn test_appearance_edits_do_not_rebuild_mesh() {
        let mut c = controller();
        c.take_rebuild();

        c.apply(Command::SetBackground("#333333".to_string())).unwrap();
        c.apply(Command::SetAmbientIntensity(0.7)).unwrap();
        c.apply(Command::SetDirectionalIntensity(0.4)).unwrap();
        c.apply(Command::SetObjectColor("#00ffaa".to_string())).unwrap();
        c.apply(Command::SetMetalness(0.5)).unwrap();
        c.apply(Command::SetRoughness(0.25)).unwrap();
        c.apply(Command::SetVisible(false)).unwrap();

        assert_eq!(c.config().background, "#333333");
        assert!(!c.take_rebuild());
    }

    #[test]
    fn test_geometry_and_selection_mark_rebuild() {
        let mut c = controller();
        c.take_rebuild();

        c.apply(Command::SetGeometryParam(GeomParam::Tube, 5.0)).unwrap();
        assert!(c.take_rebuild());
        assert!(!c.take_rebuild());

        c.apply(Command::SelectObject(0)).unwrap();
        assert!(c.take_rebuild());
    }

    #[test]
    fn test_geometry_edit_targets_selected_object() {
        let mut c = controller();
        c.apply(Command::SetGeometryParam(GeomParam::Radius, 4.0))
            .unwrap();
        assert_eq!(c.selected_object().geometry.radius, 4.0);
    }

    #[test]
    fn test_modulation_entry_initializes_from_baseline() {
        let mut c = controller();
        c.apply(Command::ToggleBand(GeomParam::Tube, Band::Low))
            .unwrap();

        let spec = &c.selected_object().animation[&GeomParam::Tube];
        assert_eq!(spec.min, 3.0);
        assert_eq!(spec.max, 3.0);
        assert_eq!(spec.bands, vec![Band::Low]);
    }

    #[test]
    fn test_toggle_band_adds_then_removes() {
        let mut c = controller();
        c.apply(Command::ToggleBand(GeomParam::Radius, Band::High))
            .unwrap();
        c.apply(Command::ToggleBand(GeomParam::Radius, Band::Mid))
            .unwrap();
        c.apply(Command::ToggleBand(GeomParam::Radius, Band::High))
            .unwrap();

        let spec = &c.selected_object().animation[&GeomParam::Radius];
        assert_eq!(spec.bands, vec![Band::Mid]);
    }

    #[test]
    fn test_modulation_range_edits() {
        let mut c = controller();
        c.apply(Command::SetModulationMin(GeomParam::Q, 1.0)).unwrap();
        c.apply(Command::SetModulationMax(GeomParam::Q, 9.0)).unwrap();

        let spec = &c.selected_object().animation[&GeomParam::Q];
        assert_eq!((spec.min, spec.max), (1.0, 9.0));
        assert!(spec.bands.is_empty());
    }

    #[test]
    fn test_select_object_clamps_index() {
        let mut c = controller();
        c.apply(Command::SelectObject(42)).unwrap();
        assert_eq!(c.selected(), 0);
    }

    #[test]
    fn test_animation_toggles_are_independent() {
        let mut c = controller();
        assert!(c.rotate_anim && c.scale_anim);

        c.apply(Command::ToggleRotation).unwrap();
        assert!(!c.rotate_anim);
        assert!(c.scale_anim);

        c.apply(Command::ToggleScale).unwrap();
        assert!(!c.scale_anim);
    }

    #[test]
    fn test_failed_import_keeps_prior_config() {
        let mut c = controller();
        c.apply(Command::SetBackground("#abcdef".to_string())).unwrap();
        c.take_rebuild();

        let err = c
            .apply(Command::ImportDocument(
                "not: [valid, yaml: structure".to_string(),
            ))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDocument(_)));
        assert_eq!(c.config().background, "#abcdef");
        assert!(!c.take_rebuild());
    }

    #[test]
    fn test_import_replaces_config_wholesale() {
        let mut c = controller();
        c.apply(Command::SetGeometryParam(GeomParam::Radius, 99.0))
            .unwrap();

        c.apply(Command::ImportDocument("background: '#000001'".to_string()))
            .unwrap();
        assert_eq!(c.config().background, "#000001");
        // Old edits are discarded, never merged into the import.
        assert_eq!(c.selected_object().geometry.radius, 10.0);
        assert!(c.take_rebuild());
    }

    #[test]
    fn test_apply_document_is_strict() {
        let mut c = controller();
        let err = c
            .apply(Command::ApplyDocument("background: '#000001'".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequiredKeys(_)));

        let full = c.export_yaml().unwrap();
        c.apply(Command::ApplyDocument(full)).unwrap();
    }

    #[test]
    fn test_import_reclamps_selection() {
        let mut doc = SceneConfig::default();
        doc.objects.push(SceneObject {
            id: "obj-2".to_string(),
            ..SceneObject::default()
        });
        let mut c = SceneController::new(doc);
        c.apply(Command::SelectObject(1)).unwrap();

        // Import a single-object scene; the selection must clamp back.
        c.apply(Command::ImportDocument("background: '#222222'".to_string()))
            .unwrap();
        assert_eq!(c.selected(), 0);
    }

    #[test]
    fn test_unrecognized_color_is_kept_in_document() {
        let mut c = controller();
        c.apply(Command::SetBackground("blue".to_string())).unwrap();

        // The document keeps the raw string (lossless export); only the
        // render path substitutes the fallback.
        assert_eq!(c.config().background, "blue");
        assert_eq!(crate::rendering::color_or_default("blue"), [1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_diff_against_candidate_document() {
        let c = controller();
        let entries = c.diff_against("background: '#424242'").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "background");
    }
}
