//! Knot system: per-frame audio-reactive mesh rebuild and transform
//! animation for the selected scene object.

pub mod mesh;

pub use mesh::{KnotMesh, Vertex};

use glam::{EulerRot, Mat4, Vec3};

use crate::modulation::{animated_value, AudioBands};
use crate::params::RotationTuning;
use crate::scene::{SceneObject, TorusKnotParams};

/// Resolve the object's geometry with every modulated parameter replaced
/// by its animated value for this frame.
pub fn animated_geometry(object: &SceneObject, bands: &AudioBands) -> TorusKnotParams {
    let mut geometry = object.geometry;
    for (&param, spec) in &object.animation {
        let baseline = object.geometry.value(param);
        geometry.set(param, animated_value(Some(spec), baseline, bands));
    }
    geometry
}

/// Live mesh state for the selected object.
///
/// The mesh geometry is regenerated from scratch every frame (the previous
/// frame's buffers are dropped); rotation accumulates per-frame deltas and
/// survives geometry swaps, mirroring an engine mesh whose material and
/// identity persist while only its geometry is replaced.
pub struct KnotSystem {
    pub mesh: KnotMesh,
    rotation: Vec3,
    tuning: RotationTuning,
}

impl KnotSystem {
    /// Build the initial mesh from an object's committed (baseline) values.
    pub fn new(object: &SceneObject) -> Self {
        Self {
            mesh: KnotMesh::new(&object.geometry),
            rotation: object.transform.rotation.to_vec3(),
            tuning: RotationTuning::default(),
        }
    }

    /// Full rebind after a committed config change (edit, selection change,
    /// import): rebuild from baseline values and restart rotation from the
    /// object's authored transform.
    pub fn rebind(&mut self, object: &SceneObject) {
        self.mesh = KnotMesh::new(&object.geometry);
        self.rotation = object.transform.rotation.to_vec3();
    }

    /// Advance one animation frame: regenerate geometry from the modulated
    /// parameters, accumulate rotation deltas, and return the model matrix.
    pub fn update(
        &mut self,
        object: &SceneObject,
        bands: &AudioBands,
        rotate_anim: bool,
        scale_anim: bool,
    ) -> Mat4 {
        let geometry = animated_geometry(object, bands);
        self.mesh = KnotMesh::new(&geometry);

        if rotate_anim {
            self.rotation.y += self.tuning.y_base + bands.mid * self.tuning.y_mid_scale;
            self.rotation.x += self.tuning.x_base + bands.low * self.tuning.x_low_scale;
        }

        let scale = if scale_anim {
            Vec3::splat(1.0 + bands.high)
        } else {
            object.transform.scale.to_vec3()
        };

        Mat4::from_translation(object.transform.position.to_vec3())
            * Mat4::from_euler(
                EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            )
            * Mat4::from_scale(scale)
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }
}
