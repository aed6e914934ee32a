//! `go.mod` bookkeeping for handlers outside `package main`.
//!
//! A named package can only be imported by the adapter through a module, so
//! the normalizer makes sure a `go.mod` exists beside the entrypoint, works
//! out the package's import path, moves the user file into a directory named
//! after the package, and lets `go mod tidy` fill in the requirements.

mod descriptor;

pub use descriptor::ModuleDescriptor;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::consts::GO_MOD_FILE;
use crate::toolchain::{Toolchain, ToolchainError};

/// Normalization steps, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStep {
  Inspect,
  CreateDescriptor,
  ReadDescriptor,
  Relocate,
  Tidy,
}

impl fmt::Display for ModuleStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let step = match self {
      Self::Inspect => "inspect go.mod",
      Self::CreateDescriptor => "create default go.mod",
      Self::ReadDescriptor => "read go.mod",
      Self::Relocate => "move entry to package folder",
      Self::Tidy => "tidy go.mod",
    };
    f.write_str(step)
  }
}

#[derive(Debug, Error)]
pub enum ModuleSetupError {
  #[error("failed to {step} ({}): {source}", path.display())]
  Io {
    step: ModuleStep,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to {step}: {} does not begin with a module directive", path.display())]
  InvalidDescriptor { step: ModuleStep, path: PathBuf },

  #[error("failed to {step}: {source}")]
  Tidy {
    step: ModuleStep,
    #[source]
    source: ToolchainError,
  },
}

impl ModuleSetupError {
  /// The step that failed.
  pub fn step(&self) -> ModuleStep {
    match self {
      Self::Io { step, .. } | Self::InvalidDescriptor { step, .. } | Self::Tidy { step, .. } => *step,
    }
  }

  fn io(step: ModuleStep, path: &Path, source: std::io::Error) -> Self {
    Self::Io {
      step,
      path: path.to_path_buf(),
      source,
    }
  }
}

/// The module a named package is compiled through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
  pub descriptor: ModuleDescriptor,

  /// Whether `go.mod` was already present before normalization.
  pub pre_existing: bool,

  /// Import path the adapter uses for the user package.
  pub import_path: String,
}

/// Make sure `entry_dir` has a `go.mod` and derive the import path of
/// `package_name` from it.
pub async fn ensure_descriptor(entry_dir: &Path, package_name: &str) -> Result<ResolvedModule, ModuleSetupError> {
  let go_mod = entry_dir.join(GO_MOD_FILE);

  let pre_existing = fs::try_exists(&go_mod)
    .await
    .map_err(|e| ModuleSetupError::io(ModuleStep::Inspect, &go_mod, e))?;

  let descriptor = if pre_existing {
    let contents = fs::read_to_string(&go_mod)
      .await
      .map_err(|e| ModuleSetupError::io(ModuleStep::ReadDescriptor, &go_mod, e))?;
    ModuleDescriptor::parse(&contents).ok_or_else(|| ModuleSetupError::InvalidDescriptor {
      step: ModuleStep::ReadDescriptor,
      path: go_mod.clone(),
    })?
  } else {
    let descriptor = ModuleDescriptor::synthesize(package_name);
    fs::write(&go_mod, descriptor.render()).await.map_err(|e| {
      warn!(package = %package_name, "failed to create default go.mod");
      ModuleSetupError::io(ModuleStep::CreateDescriptor, &go_mod, e)
    })?;
    debug!(path = ?go_mod, "created default go.mod");
    descriptor
  };

  let import_path = descriptor.import_path(package_name);
  debug!(import_path = %import_path, pre_existing, "resolved package import path");

  Ok(ResolvedModule {
    descriptor,
    pre_existing,
    import_path,
  })
}

/// Where the entrypoint lands once moved into its package directory.
///
/// Only the final component of `entrypoint` is kept, however deeply nested
/// the logical path is.
pub fn relocation_target(entry_dir: &Path, package_name: &str, entrypoint: &str) -> PathBuf {
  let file_name = Path::new(entrypoint)
    .file_name()
    .map(PathBuf::from)
    .unwrap_or_else(|| PathBuf::from(entrypoint));
  entry_dir.join(package_name).join(file_name)
}

/// Move the downloaded entrypoint into `<entry_dir>/<package_name>/`.
pub async fn relocate_entry(
  entry_fs_path: &Path,
  entry_dir: &Path,
  package_name: &str,
  entrypoint: &str,
) -> Result<PathBuf, ModuleSetupError> {
  let destination = relocation_target(entry_dir, package_name, entrypoint);
  let step = ModuleStep::Relocate;

  if let Some(parent) = destination.parent() {
    fs::create_dir_all(parent)
      .await
      .map_err(|e| ModuleSetupError::io(step, parent, e))?;
  }

  let exists = fs::try_exists(&destination)
    .await
    .map_err(|e| ModuleSetupError::io(step, &destination, e))?;
  if exists {
    return Err(ModuleSetupError::io(
      step,
      &destination,
      std::io::Error::new(std::io::ErrorKind::AlreadyExists, "destination already exists"),
    ));
  }

  fs::rename(entry_fs_path, &destination)
    .await
    .map_err(|e| ModuleSetupError::io(step, entry_fs_path, e))?;

  debug!(from = ?entry_fs_path, to = ?destination, "moved entry to package folder");
  Ok(destination)
}

/// Run `go mod tidy` so transitive requirements are declared before building.
pub async fn tidy(toolchain: &impl Toolchain) -> Result<(), ModuleSetupError> {
  info!("tidy go.mod file");
  toolchain.mod_tidy().await.map_err(|source| ModuleSetupError::Tidy {
    step: ModuleStep::Tidy,
    source,
  })
}
