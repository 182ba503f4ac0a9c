//! # Pipeline — Linking the Program and Owning Frame Resources
//!
//! [`TorusRenderer`] owns everything the per-frame pass binds: the render
//! pipeline (the "linked program"), the scene uniform buffer, the texture
//! sampler, and the depth attachment.
//!
//! ## The Scene Uniform Block
//!
//! The host-side [`SceneUniform`] must match the shader's std140 block
//! bit-for-bit:
//!
//! ```text
//! SceneUniform (272 bytes)
//! ┌────────────┬────────────┬────────────┬────────────┬───────────┬──────┐
//! │ view       │ proj       │ model_view │ mvp        │ light_pos │ pad  │
//! │ mat4x4     │ mat4x4     │ mat4x4     │ mat4x4     │ vec3      │ f32  │
//! │ offset 0   │ offset 64  │ offset 128 │ offset 192 │ offset 256│ 268  │
//! └────────────┴────────────┴────────────┴────────────┴───────────┴──────┘
//! ```
//!
//! The trailing pad is explicit — std140 rounds the block size up to 16 —
//! and the whole layout is pinned by compile-time assertions below.
//!
//! ## Linking
//!
//! Pipeline creation is where wgpu validates the interface between the two
//! stages and the fixed vertex/uniform layouts, so it plays the role of
//! program linking. It runs under a validation error scope: on failure the
//! diagnostic is surfaced and the candidate pipeline is dropped.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::camera::OrbitCamera;
use crate::error::Error;
use crate::mesh::Vertex;
use crate::render::GpuContext;
use crate::shader::ShaderProgram;

/// Depth attachment format.
pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Fixed light position in world space.
const LIGHT_POS: Vec3 = Vec3::new(-10.0, 10.0, 10.0);

/// Per-frame uniform block: matrices plus the view-space light position.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SceneUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub model_view_proj: [[f32; 4]; 4],
    pub light_pos: [f32; 3],
    pub _pad: f32,
}

// The shader reads this block verbatim; pin the layout at compile time.
const _: () = assert!(std::mem::size_of::<SceneUniform>() == 272);
const _: () = assert!(std::mem::offset_of!(SceneUniform, proj) == 64);
const _: () = assert!(std::mem::offset_of!(SceneUniform, model_view) == 128);
const _: () = assert!(std::mem::offset_of!(SceneUniform, model_view_proj) == 192);
const _: () = assert!(std::mem::offset_of!(SceneUniform, light_pos) == 256);

impl SceneUniform {
    /// Recompute the whole block from the camera and projection.
    ///
    /// The model matrix is identity, so model-view equals the view matrix;
    /// the light is transformed into view space on the host.
    pub fn compute(camera: &OrbitCamera, proj: Mat4) -> Self {
        let view = camera.view_matrix();
        let model_view = view;
        let model_view_proj = proj * model_view;
        let light = view.transform_point3(LIGHT_POS);

        Self {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            model_view: model_view.to_cols_array_2d(),
            model_view_proj: model_view_proj.to_cols_array_2d(),
            light_pos: light.to_array(),
            _pad: 0.0,
        }
    }
}

/// GPU resources for drawing the torus.
pub struct TorusRenderer {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
    pub scene_buffer: wgpu::Buffer,
    pub sampler: wgpu::Sampler,
    pub depth_texture: wgpu::TextureView,
    pub depth_size: (u32, u32),
}

impl TorusRenderer {
    /// Link the program and create the frame resources.
    pub fn new(
        gpu: &GpuContext,
        program: &ShaderProgram,
        texture: &wgpu::TextureView,
    ) -> Result<Self, Error> {
        let device = &gpu.device;

        // ── Bind group layout: uniform block, texture, sampler ──────────
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("torus bind group layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(
                                std::mem::size_of::<SceneUniform>() as u64,
                            ),
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        // ── Pipeline (the "link" step) ──────────────────────────────────
        let pipeline = link_pipeline(gpu, &bind_group_layout, program)?;

        // ── Scene uniform buffer + sampler ──────────────────────────────
        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("scene uniform buffer"),
            contents: bytemuck::bytes_of(&SceneUniform::compute(
                &OrbitCamera::default(),
                Mat4::IDENTITY,
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Trilinear minification, linear magnification.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("torus sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("torus bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: scene_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(texture),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let (w, h) = gpu.surface_size();
        let depth_texture = create_depth_texture(device, w, h);

        Ok(Self {
            pipeline,
            bind_group_layout,
            bind_group,
            scene_buffer,
            sampler,
            depth_texture,
            depth_size: (w, h),
        })
    }

    /// Relink the program from freshly loaded modules (hot-reload).
    ///
    /// The current pipeline is replaced only if the candidate links cleanly;
    /// on failure it is dropped and the old pipeline keeps rendering.
    pub fn relink(&mut self, gpu: &GpuContext, program: &ShaderProgram) -> Result<(), Error> {
        self.pipeline = link_pipeline(gpu, &self.bind_group_layout, program)?;
        Ok(())
    }

    /// Recreate the depth texture if the surface size changed.
    pub fn resize_depth_if_needed(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if (width, height) != self.depth_size && width > 0 && height > 0 {
            self.depth_texture = create_depth_texture(device, width, height);
            self.depth_size = (width, height);
        }
    }
}

/// Create the render pipeline from both stages under a validation scope.
///
/// The link log is surfaced on failure and the candidate pipeline dropped.
fn link_pipeline(
    gpu: &GpuContext,
    bind_group_layout: &wgpu::BindGroupLayout,
    program: &ShaderProgram,
) -> Result<wgpu::RenderPipeline, Error> {
    let device = &gpu.device;

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("torus pipeline layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("torus pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &program.vertex,
            entry_point: Some("main"),
            buffers: &[Vertex::LAYOUT],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &program.fragment,
            entry_point: Some("main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: gpu.surface_format(),
                blend: None, // opaque only
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => {
            let log = err.to_string();
            log::error!("failed to link shader program:\n{log}");
            Err(Error::PipelineLink { log })
        }
        None => {
            log::info!("successfully linked shader program");
            Ok(pipeline)
        }
    }
}

/// Create a depth texture at the given dimensions.
fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_uniform_layout_is_pinned() {
        assert_eq!(std::mem::size_of::<SceneUniform>(), 272);
        assert_eq!(std::mem::offset_of!(SceneUniform, view), 0);
        assert_eq!(std::mem::offset_of!(SceneUniform, proj), 64);
        assert_eq!(std::mem::offset_of!(SceneUniform, model_view), 128);
        assert_eq!(std::mem::offset_of!(SceneUniform, model_view_proj), 192);
        assert_eq!(std::mem::offset_of!(SceneUniform, light_pos), 256);
    }

    #[test]
    fn model_view_equals_view_for_identity_model() {
        let camera = OrbitCamera::default();
        let scene = SceneUniform::compute(&camera, Mat4::IDENTITY);
        assert_eq!(scene.view, scene.model_view);
    }

    #[test]
    fn mvp_is_projection_times_model_view() {
        let camera = OrbitCamera {
            orbit: 30.0,
            pitch: 10.0,
            distance: 5.0,
        };
        let proj = Mat4::perspective_rh(50f32.to_radians(), 4.0 / 3.0, 0.5, 500.0);
        let scene = SceneUniform::compute(&camera, proj);
        let expected = proj * camera.view_matrix();
        assert_eq!(scene.model_view_proj, expected.to_cols_array_2d());
    }

    #[test]
    fn light_is_transformed_into_view_space() {
        // With a default camera the light cannot still be at its world
        // position unless the view transform were identity.
        let camera = OrbitCamera::default();
        let scene = SceneUniform::compute(&camera, Mat4::IDENTITY);
        assert_ne!(scene.light_pos, [-10.0, 10.0, 10.0]);

        // A camera with no offset at all leaves the light where it was.
        let null_camera = OrbitCamera {
            orbit: 0.0,
            pitch: 0.0,
            distance: 0.0,
        };
        let scene = SceneUniform::compute(&null_camera, Mat4::IDENTITY);
        assert_eq!(scene.light_pos, [-10.0, 10.0, 10.0]);
    }
}
