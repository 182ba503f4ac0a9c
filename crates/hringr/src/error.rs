//! Startup error taxonomy.
//!
//! Every failure during initialization is terminal for the process: the
//! caller logs the error and exits with a non-zero code. Nothing here is
//! recoverable mid-frame — GPU validation errors after startup are treated
//! as programming errors and panic via the uncaptured-error hook.

use std::path::PathBuf;

/// Fatal initialization errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No suitable GPU adapter was found.
    #[error("no suitable GPU adapter: {0}")]
    AdapterUnavailable(#[from] wgpu::RequestAdapterError),

    /// The adapter refused to create a device with the requested limits.
    #[error("failed to create GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    /// The window surface could not be created.
    #[error("failed to create window surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    /// A shader file could not be opened or read.
    #[error("failed to read shader '{path}': {source}")]
    ShaderIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A shader stage failed to compile (or a SPIR-V blob failed validation).
    /// `log` carries the full diagnostic text.
    #[error("failed to compile shader '{path}':\n{log}")]
    ShaderCompile { path: PathBuf, log: String },

    /// The two stages compiled but could not be linked into a pipeline.
    #[error("failed to link shader program:\n{log}")]
    PipelineLink { log: String },

    /// The window could not be created.
    #[error("failed to create window: {0}")]
    CreateWindow(#[from] winit::error::OsError),

    /// The windowing event loop itself failed.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
