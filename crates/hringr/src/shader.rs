//! # Shader — Loading, Compilation, and Diagnostics
//!
//! Loads the two shader stages from disk in one of two forms, selected at
//! runtime by [`ShaderMode`]:
//!
//! - **Source**: textual GLSL, parsed and validated when the module is
//!   created (wgpu's `glsl` front end).
//! - **Binary**: precompiled SPIR-V, loaded as words and specialized against
//!   the `main` entry point when the pipeline is created (wgpu's `spirv`
//!   front end).
//!
//! Module creation runs under a validation error scope so compile failures
//! surface as errors instead of panics, and the compilation log is fetched
//! and printed whether or not compilation succeeded — an empty log prints
//! nothing. "Linking" the two stages happens at pipeline creation, in
//! [`render::pipeline`](crate::render::pipeline).

use std::borrow::Cow;
use std::path::Path;

use crate::error::Error;

/// SPIR-V magic number (little-endian word 0).
const SPIRV_MAGIC: u32 = 0x0723_0203;

/// How shader files are interpreted. A runtime option so both paths are
/// testable in one build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderMode {
    /// Textual GLSL, compiled at load time.
    Source,
    /// Precompiled SPIR-V, specialized at pipeline creation.
    Binary,
}

impl std::str::FromStr for ShaderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "glsl" | "source" => Ok(Self::Source),
            "spirv" | "binary" => Ok(Self::Binary),
            other => Err(format!("unknown shader mode '{other}'")),
        }
    }
}

impl std::fmt::Display for ShaderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => f.write_str("glsl"),
            Self::Binary => f.write_str("spirv"),
        }
    }
}

/// The two stages of the torus program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn naga(self) -> naga::ShaderStage {
        match self {
            Self::Vertex => naga::ShaderStage::Vertex,
            Self::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

/// A compiled vertex + fragment module pair, ready to link into a pipeline.
pub struct ShaderProgram {
    pub vertex: wgpu::ShaderModule,
    pub fragment: wgpu::ShaderModule,
}

/// Read an entire shader file into memory.
pub fn read_shader_bytes(path: &Path) -> Result<Vec<u8>, Error> {
    std::fs::read(path).map_err(|source| Error::ShaderIo {
        path: path.to_owned(),
        source,
    })
}

/// Sanity-check a SPIR-V blob before handing it to the driver stack.
///
/// Rejects byte lengths that are not whole words and blobs whose first word
/// is not the SPIR-V magic number.
pub fn validate_spirv(bytes: &[u8]) -> Result<(), String> {
    if bytes.len() < 4 || bytes.len() % 4 != 0 {
        return Err(format!(
            "SPIR-V length {} is not a whole number of words",
            bytes.len()
        ));
    }
    let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if magic != SPIRV_MAGIC {
        return Err(format!(
            "bad SPIR-V magic number {magic:#010x} (expected {SPIRV_MAGIC:#010x})"
        ));
    }
    Ok(())
}

/// Load and compile one shader stage from `path`.
///
/// The compilation log is printed regardless of success. On failure the
/// partially created module is dropped and the error carries the full log.
pub fn load_shader(
    device: &wgpu::Device,
    path: &Path,
    stage: ShaderStage,
    mode: ShaderMode,
) -> Result<wgpu::ShaderModule, Error> {
    let bytes = read_shader_bytes(path)?;

    let source = match mode {
        ShaderMode::Source => {
            let text = String::from_utf8(bytes).map_err(|e| Error::ShaderCompile {
                path: path.to_owned(),
                log: format!("shader source is not valid UTF-8: {e}"),
            })?;
            wgpu::ShaderSource::Glsl {
                shader: Cow::Owned(text),
                stage: stage.naga(),
                defines: Default::default(),
            }
        }
        ShaderMode::Binary => {
            validate_spirv(&bytes).map_err(|log| Error::ShaderCompile {
                path: path.to_owned(),
                log,
            })?;
            wgpu::ShaderSource::SpirV(wgpu::util::make_spirv_raw(&bytes))
        }
    };

    let label = path.display().to_string();

    // An error scope turns validation failures into a value we can inspect
    // instead of a panic through the uncaptured-error hook.
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&label),
        source,
    });
    let error = pollster::block_on(device.pop_error_scope());

    // Surface the compilation log whether or not compilation succeeded.
    let info = pollster::block_on(module.get_compilation_info());
    for message in &info.messages {
        if message.message.is_empty() {
            continue;
        }
        match message.message_type {
            wgpu::CompilationMessageType::Error => {
                log::error!("{label}: {}", message.message);
            }
            wgpu::CompilationMessageType::Warning => {
                log::warn!("{label}: {}", message.message);
            }
            wgpu::CompilationMessageType::Info => {
                log::info!("{label}: {}", message.message);
            }
        }
    }

    match error {
        Some(err) => {
            log::error!("failed to compile shader: {label}");
            Err(Error::ShaderCompile {
                path: path.to_owned(),
                log: err.to_string(),
            })
        }
        None => {
            log::info!("successfully compiled shader: {label}");
            Ok(module)
        }
    }
}

/// Load both stages of the torus program per the configured mode.
///
/// If the fragment stage fails after the vertex stage succeeded, the vertex
/// module is dropped on the way out.
pub fn load_program(
    device: &wgpu::Device,
    config: &crate::config::Config,
) -> Result<ShaderProgram, Error> {
    let vertex = load_shader(
        device,
        &config.vertex_shader_path(),
        ShaderStage::Vertex,
        config.shader_mode,
    )?;
    let fragment = load_shader(
        device,
        &config.fragment_shader_path(),
        ShaderStage::Fragment,
        config.shader_mode,
    )?;
    Ok(ShaderProgram { vertex, fragment })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn mode_parses_both_spellings() {
        assert_eq!(ShaderMode::from_str("glsl").unwrap(), ShaderMode::Source);
        assert_eq!(ShaderMode::from_str("SOURCE").unwrap(), ShaderMode::Source);
        assert_eq!(ShaderMode::from_str("spirv").unwrap(), ShaderMode::Binary);
        assert_eq!(ShaderMode::from_str("Binary").unwrap(), ShaderMode::Binary);
        assert!(ShaderMode::from_str("hlsl").is_err());
    }

    #[test]
    fn missing_file_reports_the_path() {
        let path = Path::new("no/such/shader.vert");
        let err = read_shader_bytes(path).unwrap_err();
        match err {
            Error::ShaderIo { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected ShaderIo, got {other:?}"),
        }
    }

    #[test]
    fn spirv_validation_accepts_a_minimal_header() {
        let mut blob = Vec::new();
        blob.extend_from_slice(&SPIRV_MAGIC.to_le_bytes());
        blob.extend_from_slice(&[0u8; 16]);
        assert!(validate_spirv(&blob).is_ok());
    }

    #[test]
    fn spirv_validation_rejects_misaligned_blobs() {
        let mut blob = SPIRV_MAGIC.to_le_bytes().to_vec();
        blob.push(0);
        assert!(validate_spirv(&blob).is_err());
        assert!(validate_spirv(&[]).is_err());
    }

    #[test]
    fn spirv_validation_rejects_wrong_magic() {
        // GLSL text fed to the binary path must be rejected up front.
        let text = b"#version 450\nvoid main() {}\n ...";
        let word_aligned = &text[..text.len() - text.len() % 4];
        assert!(validate_spirv(word_aligned).is_err());
    }
}
