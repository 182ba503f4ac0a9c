//! Per-frame render pass.
//!
//! The frame logic has exactly two states: before the first resize there is
//! no projection matrix and the pass only clears; once sized, every frame
//! recomputes the scene uniforms from the three camera scalars, uploads the
//! whole block, and issues one indexed draw of the torus.

use glam::Mat4;

use crate::camera::OrbitCamera;
use crate::mesh::GpuMesh;
use crate::render::GpuContext;
use crate::render::pipeline::{SceneUniform, TorusRenderer};

/// Background color (a very dark gray).
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.05,
    b: 0.05,
    a: 1.0,
};

/// Vertical field of view for the projection matrix, in degrees.
pub const FOV_Y_DEG: f32 = 50.0;
/// Near clip plane distance.
pub const Z_NEAR: f32 = 0.5;
/// Far clip plane distance.
pub const Z_FAR: f32 = 500.0;

/// Build the projection matrix for a surface of the given size.
pub fn projection_matrix(width: u32, height: u32) -> Mat4 {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    Mat4::perspective_rh(FOV_Y_DEG.to_radians(), aspect, Z_NEAR, Z_FAR)
}

/// Render a single frame.
///
/// `projection` is `None` until the window has been sized; a frame without
/// it clears the attachments and draws nothing.
pub fn render_frame(
    gpu: &GpuContext,
    renderer: &mut TorusRenderer,
    torus: &GpuMesh,
    camera: &OrbitCamera,
    projection: Option<Mat4>,
) -> Result<(), wgpu::SurfaceError> {
    let (w, h) = gpu.surface_size();
    renderer.resize_depth_if_needed(&gpu.device, w, h);

    if let Some(proj) = projection {
        let scene = SceneUniform::compute(camera, proj);
        gpu.queue
            .write_buffer(&renderer.scene_buffer, 0, bytemuck::bytes_of(&scene));
    }

    let output = gpu.surface.get_current_texture()?;
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("hringr frame encoder"),
        });

    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("torus pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &renderer.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if projection.is_some() {
            render_pass.set_pipeline(&renderer.pipeline);
            render_pass.set_bind_group(0, &renderer.bind_group, &[]);
            render_pass.set_vertex_buffer(0, torus.vertex_buffer.slice(..));
            render_pass.set_index_buffer(torus.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..torus.index_count, 0, 0..1);
        }
    }

    gpu.queue.submit(std::iter::once(encoder.finish()));
    output.present();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_guards_degenerate_sizes() {
        // Must not divide by zero while the window is still collapsing.
        let m = projection_matrix(0, 0);
        assert!(m.is_finite());
    }

    #[test]
    fn projection_uses_the_surface_aspect() {
        let m = projection_matrix(800, 600);
        let expected = Mat4::perspective_rh(50f32.to_radians(), 800.0 / 600.0, 0.5, 500.0);
        assert_eq!(m, expected);
    }
}
