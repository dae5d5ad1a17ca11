//! Torus-knot mesh generation.
//!
//! Parametric (p, q) torus-knot curve with a circular tube cross-section.
//! Frames along the curve come from finite-difference tangents, matching
//! the classic TorusKnotGeometry construction, so documents authored
//! against that geometry reproduce the same surface.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::TAU;

use crate::scene::TorusKnotParams;

/// Vertex data for the knot mesh (position + smooth normal)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Triangulated torus-knot surface.
pub struct KnotMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl KnotMesh {
    /// Build the full mesh from geometry parameters.
    ///
    /// Produces `(tubular + 1) * (radial + 1)` vertices (the seam ring is
    /// duplicated) and `tubular * radial * 6` indices.
    pub fn new(params: &TorusKnotParams) -> Self {
        let tubular = params.tubular_segments.max(3) as usize;
        let radial = params.radial_segments.max(3) as usize;
        let (p, q) = (params.p, params.q);

        let mut vertices = Vec::with_capacity((tubular + 1) * (radial + 1));
        let mut indices = Vec::with_capacity(tubular * radial * 6);

        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * p * TAU;

            // Finite-difference frame along the knot curve.
            let p1 = knot_point(u, params.radius, p, q);
            let p2 = knot_point(u + 0.01, params.radius, p, q);

            let tangent = p2 - p1;
            let mut normal = p2 + p1;
            let mut binormal = tangent.cross(normal);
            normal = binormal.cross(tangent);
            binormal = binormal.normalize();
            normal = normal.normalize();

            for j in 0..=radial {
                let v = j as f32 / radial as f32 * TAU;
                let cx = -params.tube * v.cos();
                let cy = params.tube * v.sin();

                let position = p1 + cx * normal + cy * binormal;
                let vertex_normal = (position - p1).normalize_or_zero();

                vertices.push(Vertex {
                    position: position.to_array(),
                    normal: vertex_normal.to_array(),
                });
            }
        }

        for j in 1..=tubular {
            for i in 1..=radial {
                let a = ((radial + 1) * (j - 1) + (i - 1)) as u32;
                let b = ((radial + 1) * j + (i - 1)) as u32;
                let c = ((radial + 1) * j + i) as u32;
                let d = ((radial + 1) * (j - 1) + i) as u32;

                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self { vertices, indices }
    }
}

/// Point on the (p, q) torus-knot curve at parameter `u`.
fn knot_point(u: f32, radius: f32, p: f32, q: f32) -> Vec3 {
    let cu = u.cos();
    let su = u.sin();
    let q_over_p_u = q / p * u;
    let cs = q_over_p_u.cos();

    Vec3::new(
        radius * (2.0 + cs) * 0.5 * cu,
        radius * (2.0 + cs) * su * 0.5,
        radius * q_over_p_u.sin() * 0.5,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_vertex_and_index_counts() {
        let params = TorusKnotParams::default();
        let mesh = KnotMesh::new(&params);

        let tubular = params.tubular_segments as usize;
        let radial = params.radial_segments as usize;
        assert_eq!(mesh.vertices.len(), (tubular + 1) * (radial + 1));
        assert_eq!(mesh.indices.len(), tubular * radial * 6);
    }

    #[test]
    fn test_indices_stay_in_bounds() {
        let mesh = KnotMesh::new(&TorusKnotParams::default());
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn test_normals_are_unit_length() {
        let mesh = KnotMesh::new(&TorusKnotParams::default());
        for vertex in &mesh.vertices {
            let len = Vec3::from_array(vertex.normal).length();
            assert!((len - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_degenerate_segment_counts_are_clamped() {
        let params = TorusKnotParams {
            tubular_segments: 0,
            radial_segments: 1,
            ..TorusKnotParams::default()
        };
        let mesh = KnotMesh::new(&params);

        // Floor of 3 segments in both directions.
        assert_eq!(mesh.vertices.len(), 4 * 4);
        assert_eq!(mesh.indices.len(), 3 * 3 * 6);
    }

    #[test]
    fn test_surface_stays_within_radius_bound() {
        let params = TorusKnotParams::default();
        let mesh = KnotMesh::new(&params);

        // Curve extent (1.5r in XY, 0.5r in Z) plus tube radius bounds
        // the whole surface.
        let bound = params.radius * (2.5f32).sqrt() + params.tube + 1e-3;
        for vertex in &mesh.vertices {
            assert!(Vec3::from_array(vertex.position).length() <= bound);
        }
    }
}
