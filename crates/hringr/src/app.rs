//! Application driver: window creation, event handling, and the frame loop.
//!
//! Implements [`winit::application::ApplicationHandler`]. Initialization
//! (GPU context, texture, mesh, shader program, renderer) happens once when
//! the window is created; a failure there stops the event loop and is
//! reported to `main` for a non-zero exit.

use std::sync::Arc;

use glam::Mat4;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::camera::OrbitCamera;
use crate::config::Config;
use crate::error::Error;
use crate::input::{CursorTracker, Input};
use crate::mesh::{self, GpuMesh};
use crate::reload::ShaderWatcher;
use crate::render::GpuContext;
use crate::render::pass::{self, render_frame};
use crate::render::pipeline::TorusRenderer;
use crate::shader::{self, ShaderMode};
use crate::texture;

/// Torus parameters: major radius, tube radius, ring and tube subdivisions.
const TORUS_RAD: f32 = 1.0;
const TORUS_RRAD: f32 = 0.25;
const TORUS_USUB: u32 = 32;
const TORUS_VSUB: u32 = 12;

/// Procedural texture size.
const TEXTURE_SIZE: u32 = 256;

/// Everything created at init time, dropped together at exit.
struct Scene {
    gpu: GpuContext,
    renderer: TorusRenderer,
    torus: GpuMesh,
}

/// The application state that winit drives.
struct Viewer {
    config: Config,
    window: Option<Arc<Window>>,
    scene: Option<Scene>,
    camera: OrbitCamera,
    mouse: Input<MouseButton>,
    cursor: CursorTracker,
    /// `None` until the window has been sized at least once.
    projection: Option<Mat4>,
    watcher: Option<ShaderWatcher>,
    init_error: Option<Error>,
}

impl Viewer {
    fn new(config: Config) -> Self {
        Self {
            config,
            window: None,
            scene: None,
            camera: OrbitCamera::default(),
            mouse: Input::new(),
            cursor: CursorTracker::default(),
            projection: None,
            watcher: None,
            init_error: None,
        }
    }

    /// One-time startup: GPU context, texture, mesh, shader program, renderer.
    fn init(&mut self, window: Arc<Window>) -> Result<Scene, Error> {
        let gpu = GpuContext::new(window)?;

        let texture_view = texture::create_xor_texture(&gpu, TEXTURE_SIZE, TEXTURE_SIZE);

        let torus_mesh = mesh::torus(TORUS_RAD, TORUS_RRAD, TORUS_USUB, TORUS_VSUB);
        log::debug!(
            "generated torus: {} vertices, {} indices",
            torus_mesh.vertices.len(),
            torus_mesh.indices.len()
        );
        let torus = GpuMesh::upload(&gpu, &torus_mesh);

        let program = shader::load_program(&gpu.device, &self.config)?;
        let renderer = TorusRenderer::new(&gpu, &program, &texture_view)?;

        // Watch GLSL sources for edits; binary shaders reload the same way
        // when recompiled in place.
        let paths = [
            self.config.vertex_shader_path(),
            self.config.fragment_shader_path(),
        ];
        match ShaderWatcher::watch(&paths) {
            Ok(watcher) => self.watcher = Some(watcher),
            Err(err) => log::warn!("shader hot-reload unavailable: {err}"),
        }

        let (w, h) = gpu.surface_size();
        self.projection = Some(pass::projection_matrix(w, h));

        Ok(Scene {
            gpu,
            renderer,
            torus,
        })
    }

    /// Reload and relink the shader program, keeping the old pipeline on
    /// any failure.
    fn reload_shaders(&mut self) {
        let Some(scene) = &mut self.scene else { return };

        let result = shader::load_program(&scene.gpu.device, &self.config)
            .and_then(|program| scene.renderer.relink(&scene.gpu, &program));
        match result {
            Ok(()) => log::info!("hot-reloaded shader program"),
            Err(err) => log::warn!("shader reload failed, keeping old pipeline: {err}"),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.watcher.as_ref().is_some_and(|w| w.take_change()) {
            self.reload_shaders();
        }

        let Some(scene) = &mut self.scene else { return };

        match render_frame(
            &scene.gpu,
            &mut scene.renderer,
            &scene.torus,
            &self.camera,
            self.projection,
        ) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (w, h) = scene.gpu.surface_size();
                scene.gpu.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("out of GPU memory");
                event_loop.exit();
            }
            Err(err) => {
                log::warn!("surface error: {err:?}");
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("hringr — torus")
            .with_inner_size(winit::dpi::LogicalSize::new(800.0, 600.0));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.init_error = Some(Error::CreateWindow(err));
                event_loop.exit();
                return;
            }
        };

        match self.init(window.clone()) {
            Ok(scene) => {
                self.scene = Some(scene);
                window.request_redraw();
                self.window = Some(window);
            }
            Err(err) => {
                log::error!("initialization failed: {err}");
                self.init_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("window close requested, exiting");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(scene) = &mut self.scene {
                    scene.gpu.resize(size.width, size.height);
                }
                self.projection = Some(pass::projection_matrix(size.width, size.height));
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(KeyCode::Escape) = event.physical_key {
                    if event.state == ElementState::Pressed {
                        event_loop.exit();
                    }
                }
            }

            WindowEvent::MouseInput { button, state, .. } => match state {
                ElementState::Pressed => self.mouse.press(button),
                ElementState::Released => self.mouse.release(button),
            },

            WindowEvent::CursorMoved { position, .. } => {
                let (dx, dy) = self.cursor.delta(position.x as f32, position.y as f32);
                if dx == 0.0 && dy == 0.0 {
                    return;
                }
                if self.mouse.pressed(MouseButton::Left) {
                    self.camera.rotate(dx, dy);
                }
                if self.mouse.pressed(MouseButton::Right) {
                    self.camera.zoom(dy);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

/// Run the viewer to completion.
///
/// Returns an error if initialization failed (the process should exit with
/// code 1) or if the event loop itself errored; a user-requested quit
/// returns `Ok`.
pub fn run(config: Config) -> Result<(), Error> {
    if config.shader_mode == ShaderMode::Binary {
        log::info!("loading precompiled SPIR-V shaders");
    }

    let event_loop = EventLoop::new()?;
    let mut app = Viewer::new(config);
    event_loop.run_app(&mut app)?;

    match app.init_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
