//! Compilation target detection and parsing.
//!
//! Targets are expressed with Go's `GOOS`/`GOARCH` vocabulary since that is
//! what the toolchain consumes.

pub mod arch;
pub mod os;

use std::fmt;

use arch::Arch;
use os::Os;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
  #[error("unsupported GOOS: {0}")]
  UnknownOs(String),

  #[error("unsupported GOARCH: {0}")]
  UnknownArch(String),

  #[error("host platform {os}/{arch} is not supported")]
  UnsupportedHost { os: &'static str, arch: &'static str },
}

/// Operating system and architecture pair a handler is compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
  pub os: Os,
  pub arch: Arch,
}

impl Target {
  pub fn new(os: Os, arch: Arch) -> Self {
    Self { os, arch }
  }

  /// Detect the platform this process runs on
  pub fn host() -> Result<Self, PlatformError> {
    match (Os::current(), Arch::current()) {
      (Some(os), Some(arch)) => Ok(Self { os, arch }),
      _ => Err(PlatformError::UnsupportedHost {
        os: std::env::consts::OS,
        arch: std::env::consts::ARCH,
      }),
    }
  }

  /// Build a target from `GOOS`/`GOARCH` strings
  pub fn parse(goos: &str, goarch: &str) -> Result<Self, PlatformError> {
    Ok(Self {
      os: goos.parse()?,
      arch: goarch.parse()?,
    })
  }

  pub fn goos(&self) -> &'static str {
    self.os.as_str()
  }

  pub fn goarch(&self) -> &'static str {
    self.arch.as_str()
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.os, self.arch)
  }
}
