//! Rendering: GPU context, the torus pipeline, and the per-frame pass.

pub mod gpu;
pub mod pass;
pub mod pipeline;

pub use gpu::GpuContext;
