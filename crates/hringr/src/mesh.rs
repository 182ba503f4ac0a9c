//! # Mesh — Torus Generation and GPU Upload
//!
//! Generates the parametric torus on the CPU and uploads it to GPU buffers.
//! The torus is the only geometry in the program, so there is no mesh store
//! or handle indirection: one [`Mesh`] in, one [`GpuMesh`] out.
//!
//! ## Winding Order and Normals
//!
//! All triangles use counter-clockwise winding when viewed from outside the
//! surface. This matches the pipeline's `FrontFace::Ccw` setting, so
//! back-face culling removes the inner-facing half of each quad pair.
//! Normals point radially out of the tube: each vertex's normal is the unit
//! vector from its ring-center point to the vertex itself.
//!
//! ## The Seam
//!
//! The surface wraps in both parametric directions. Rather than wrapping
//! indices, an extra ring and an extra column are generated at parameter 1.0
//! so each quad indexes a plain row-major grid. The duplicated seam vertices
//! reuse the angle at parameter 0, which makes the seam close exactly
//! (bit-identical positions) while their UVs still reach 1.0 for correct
//! texture wrapping.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::render::GpuContext;

/// Per-vertex data: position, surface normal, and texture UV.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position: vec3<f32>
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal: vec3<f32>
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv: vec2<f32>
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };
}

/// CPU-side mesh data. Immutable once generated.
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Generate a torus with major radius `rad` and tube radius `rrad`.
///
/// `usub` subdivides the ring, `vsub` subdivides the tube; both clamp to a
/// minimum of 3. The vertex grid is `(usub+1) × (vsub+1)`, row-major with
/// stride `vsub+1`, and each of the `usub × vsub` cells emits two triangles.
pub fn torus(rad: f32, rrad: f32, usub: u32, vsub: u32) -> Mesh {
    let usub = usub.max(3);
    let vsub = vsub.max(3);
    let uverts = usub + 1;
    let vverts = vsub + 1;

    let mut vertices = Vec::with_capacity((uverts * vverts) as usize);
    let mut indices = Vec::with_capacity((usub * vsub * 6) as usize);

    for i in 0..uverts {
        let u = i as f32 / usub as f32;
        let theta = (i % usub) as f32 / usub as f32 * TAU;

        for j in 0..vverts {
            let v = j as f32 / vsub as f32;
            let phi = (j % vsub) as f32 / vsub as f32 * TAU;

            vertices.push(torus_vertex(rad, rrad, theta, phi, u, v));

            if i < usub && j < vsub {
                let n = i * vverts + j;
                indices.extend_from_slice(&[
                    n,
                    n + vverts + 1,
                    n + 1,
                    n,
                    n + vverts,
                    n + vverts + 1,
                ]);
            }
        }
    }

    Mesh { vertices, indices }
}

/// One torus vertex at ring angle `theta` and tube angle `phi`.
fn torus_vertex(rad: f32, rrad: f32, theta: f32, phi: f32, u: f32, v: f32) -> Vertex {
    let (sin_t, cos_t) = theta.sin_cos();

    // Ring-center point on the major circle in the XZ plane.
    let cx = sin_t * rad;
    let cy = 0.0;
    let cz = -cos_t * rad;

    // Tube-circle point in the ring's local frame, then rotated into place
    // by the ring angle.
    let rx = -phi.cos() * rrad + rad;
    let ry = phi.sin() * rrad;
    let rz = 0.0;

    let px = rx * sin_t + rz * cos_t;
    let py = ry;
    let pz = -rx * cos_t + rz * sin_t;

    Vertex {
        position: [px, py, pz],
        normal: [(px - cx) / rrad, (py - cy) / rrad, (pz - cz) / rrad],
        uv: [u, v],
    }
}

/// A mesh that has been uploaded to GPU buffers.
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    /// Upload mesh data to static GPU buffers.
    pub fn upload(gpu: &GpuContext, mesh: &Mesh) -> Self {
        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("torus vertex buffer"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("torus index buffer"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn torus_has_correct_counts() {
        for (usub, vsub) in [(3, 3), (8, 4), (32, 12), (64, 48)] {
            let mesh = torus(1.0, 0.25, usub, vsub);
            assert_eq!(mesh.vertices.len(), ((usub + 1) * (vsub + 1)) as usize);
            assert_eq!(mesh.indices.len(), (usub * vsub * 6) as usize);
        }
    }

    #[test]
    fn subdivisions_clamp_to_three() {
        let mesh = torus(1.0, 0.25, 0, 1);
        assert_eq!(mesh.vertices.len(), 4 * 4);
        assert_eq!(mesh.indices.len(), 3 * 3 * 6);
    }

    #[test]
    fn reference_torus_counts() {
        let mesh = torus(1.0, 0.25, 32, 12);
        assert_eq!(mesh.vertices.len(), 429, "33 * 13 vertices");
        assert_eq!(mesh.indices.len(), 2304, "32 * 12 * 6 indices");
    }

    #[test]
    fn indices_in_range() {
        let mesh = torus(1.0, 0.25, 32, 12);
        for &idx in &mesh.indices {
            assert!((idx as usize) < mesh.vertices.len(), "index {idx} out of range");
        }
    }

    #[test]
    fn ring_seam_closes_exactly() {
        let (usub, vsub) = (32u32, 12u32);
        let mesh = torus(1.0, 0.25, usub, vsub);
        let stride = (vsub + 1) as usize;
        for j in 0..stride {
            let first = &mesh.vertices[j];
            let last = &mesh.vertices[usub as usize * stride + j];
            assert_eq!(first.position, last.position, "ring seam open at tube slot {j}");
            assert_eq!(first.normal, last.normal);
            // Distinct slots: the UVs differ even though the geometry coincides.
            assert_eq!(first.uv[0], 0.0);
            assert_eq!(last.uv[0], 1.0);
        }
    }

    #[test]
    fn tube_seam_closes_exactly() {
        let (usub, vsub) = (32u32, 12u32);
        let mesh = torus(1.0, 0.25, usub, vsub);
        let stride = (vsub + 1) as usize;
        for i in 0..=usub as usize {
            let first = &mesh.vertices[i * stride];
            let last = &mesh.vertices[i * stride + vsub as usize];
            assert_eq!(first.position, last.position, "tube seam open at ring {i}");
            assert_eq!(first.uv[1], 0.0);
            assert_eq!(last.uv[1], 1.0);
        }
    }

    #[test]
    fn normals_are_unit_length() {
        let mesh = torus(1.0, 0.25, 16, 8);
        for v in &mesh.vertices {
            let len = (v.normal[0].powi(2) + v.normal[1].powi(2) + v.normal[2].powi(2)).sqrt();
            assert!((len - 1.0).abs() < 1e-5, "normal should be unit length, got {len}");
        }
    }

    #[test]
    fn vertices_sit_on_the_tube_surface() {
        let (rad, rrad) = (1.0f32, 0.25f32);
        let mesh = torus(rad, rrad, 16, 8);
        for v in &mesh.vertices {
            // Distance from the major circle must equal the tube radius.
            let ring = (v.position[0].powi(2) + v.position[2].powi(2)).sqrt() - rad;
            let dist = (ring.powi(2) + v.position[1].powi(2)).sqrt();
            assert!((dist - rrad).abs() < 1e-4, "vertex off the tube surface: {dist}");
        }
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        assert_eq!(std::mem::offset_of!(Vertex, normal), 12);
        assert_eq!(std::mem::offset_of!(Vertex, uv), 24);
    }
}
