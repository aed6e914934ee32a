//! Builder configuration.
//!
//! Settings come from defaults, then `GOBUILDER_*` environment variables.
//! The CLI applies its own flags on top of [`BuilderConfig::from_env`].

use std::path::PathBuf;

use thiserror::Error;

use crate::platform::os::Os;
use crate::platform::arch::Arch;
use crate::platform::{PlatformError, Target};

/// Go binary override.
pub const ENV_GO: &str = "GOBUILDER_GO";
/// Analyzer helper binary override.
pub const ENV_ANALYZER: &str = "GOBUILDER_ANALYZER";
/// Directory under which per-build workspaces are created.
pub const ENV_TMPDIR: &str = "GOBUILDER_TMPDIR";
/// Target `GOOS` override.
pub const ENV_GOOS: &str = "GOBUILDER_GOOS";
/// Target `GOARCH` override.
pub const ENV_GOARCH: &str = "GOBUILDER_GOARCH";

/// Default name of the exported-function analyzer helper.
pub const DEFAULT_ANALYZER: &str = "get-exported-function-name";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid target in environment: {0}")]
  Target(#[from] PlatformError),

  #[error("{var} is set but empty")]
  Empty { var: &'static str },
}

/// Configuration shared by every build.
#[derive(Debug, Clone)]
pub struct BuilderConfig {
  /// The `go` executable.
  pub go_bin: PathBuf,

  /// Helper that prints `<function>,<package>` for a Go file.
  pub analyzer_bin: PathBuf,

  /// Parent directory for the module and output roots.
  pub temp_root: PathBuf,

  /// Platform the handler is compiled for.
  pub target: Target,
}

impl Default for BuilderConfig {
  fn default() -> Self {
    Self {
      go_bin: PathBuf::from("go"),
      analyzer_bin: PathBuf::from(DEFAULT_ANALYZER),
      temp_root: std::env::temp_dir(),
      target: Target::host().unwrap_or(Target::new(Os::Linux, Arch::X86_64)),
    }
  }
}

impl BuilderConfig {
  /// Defaults overridden by any `GOBUILDER_*` variables that are set.
  pub fn from_env() -> Result<Self, ConfigError> {
    let mut config = Self::default();

    if let Some(go) = env_path(ENV_GO)? {
      config.go_bin = go;
    }
    if let Some(analyzer) = env_path(ENV_ANALYZER)? {
      config.analyzer_bin = analyzer;
    }
    if let Some(tmp) = env_path(ENV_TMPDIR)? {
      config.temp_root = tmp;
    }
    if let Ok(goos) = std::env::var(ENV_GOOS) {
      config.target.os = goos.parse()?;
    }
    if let Ok(goarch) = std::env::var(ENV_GOARCH) {
      config.target.arch = goarch.parse()?;
    }

    Ok(config)
  }
}

fn env_path(var: &'static str) -> Result<Option<PathBuf>, ConfigError> {
  match std::env::var(var) {
    Ok(value) if value.is_empty() => Err(ConfigError::Empty { var }),
    Ok(value) => Ok(Some(PathBuf::from(value))),
    Err(_) => Ok(None),
  }
}
