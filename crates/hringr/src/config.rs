//! Runtime configuration and argument parsing.
//!
//! The shader loading mode is a runtime option rather than a build-time
//! switch, so both paths are exercised by a single binary: `--glsl` (the
//! default) reads textual GLSL, `--spirv` reads precompiled SPIR-V from the
//! same shader directory.

use std::path::PathBuf;

use crate::shader::ShaderMode;

/// Usage text printed by `--help` and on argument errors.
pub const USAGE: &str = "\
usage: hringr [options]

options:
  --glsl           load shaders from GLSL source (default)
  --spirv          load precompiled SPIR-V shader binaries
  --shaders <dir>  shader directory (default: shaders)
  -h, --help       print this help
";

/// Viewer configuration, fully resolved before the window opens.
#[derive(Debug, Clone)]
pub struct Config {
    pub shader_mode: ShaderMode,
    pub shader_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shader_mode: ShaderMode::Source,
            shader_dir: PathBuf::from("shaders"),
        }
    }
}

impl Config {
    /// Path of the vertex stage for the configured mode.
    pub fn vertex_shader_path(&self) -> PathBuf {
        self.stage_path("torus.vert")
    }

    /// Path of the fragment stage for the configured mode.
    pub fn fragment_shader_path(&self) -> PathBuf {
        self.stage_path("torus.frag")
    }

    fn stage_path(&self, name: &str) -> PathBuf {
        match self.shader_mode {
            ShaderMode::Source => self.shader_dir.join(name),
            ShaderMode::Binary => self.shader_dir.join(format!("{name}.spv")),
        }
    }
}

/// What `parse_args` decided: run with a config, or just print help.
#[derive(Debug)]
pub enum ArgsOutcome {
    Run(Config),
    Help,
}

/// Parse command-line arguments (without the program name).
///
/// Unknown flags and missing option values are errors; the caller prints
/// [`USAGE`] and exits non-zero.
pub fn parse_args<I>(args: I) -> Result<ArgsOutcome, String>
where
    I: IntoIterator<Item = String>,
{
    let mut config = Config::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--glsl" => config.shader_mode = ShaderMode::Source,
            "--spirv" => config.shader_mode = ShaderMode::Binary,
            "--shaders" => {
                let dir = args
                    .next()
                    .ok_or_else(|| "--shaders requires a directory".to_string())?;
                config.shader_dir = PathBuf::from(dir);
            }
            "-h" | "--help" => return Ok(ArgsOutcome::Help),
            other => return Err(format!("unknown argument '{other}'")),
        }
    }

    Ok(ArgsOutcome::Run(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ArgsOutcome, String> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn defaults_to_glsl_source() {
        let ArgsOutcome::Run(config) = parse(&[]).unwrap() else {
            panic!("expected a run config");
        };
        assert_eq!(config.shader_mode, ShaderMode::Source);
        assert_eq!(config.vertex_shader_path(), PathBuf::from("shaders/torus.vert"));
        assert_eq!(config.fragment_shader_path(), PathBuf::from("shaders/torus.frag"));
    }

    #[test]
    fn spirv_mode_appends_spv_extension() {
        let ArgsOutcome::Run(config) = parse(&["--spirv"]).unwrap() else {
            panic!("expected a run config");
        };
        assert_eq!(config.shader_mode, ShaderMode::Binary);
        assert_eq!(
            config.vertex_shader_path(),
            PathBuf::from("shaders/torus.vert.spv")
        );
    }

    #[test]
    fn shader_dir_override() {
        let ArgsOutcome::Run(config) = parse(&["--shaders", "assets/sdr"]).unwrap() else {
            panic!("expected a run config");
        };
        assert_eq!(config.fragment_shader_path(), PathBuf::from("assets/sdr/torus.frag"));
    }

    #[test]
    fn unknown_flag_is_an_error() {
        assert!(parse(&["--bogus"]).is_err());
        assert!(parse(&["--shaders"]).is_err());
    }

    #[test]
    fn help_short_circuits() {
        assert!(matches!(parse(&["-h"]).unwrap(), ArgsOutcome::Help));
        assert!(matches!(parse(&["--help"]).unwrap(), ArgsOutcome::Help));
    }
}
