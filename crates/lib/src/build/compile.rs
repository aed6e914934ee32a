//! Dependency resolution and compilation.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

use crate::toolchain::{BuildSpec, Toolchain};

#[derive(Debug, Error)]
pub enum CompileError {
  #[error("failed to `go get`:\n{diagnostics}")]
  DependencyResolution { diagnostics: String },

  #[error("failed to `go build`:\n{diagnostics}")]
  Compile { diagnostics: String },

  #[error("`go build` succeeded but produced no executable at {}", path.display())]
  MissingExecutable { path: PathBuf },

  #[error("failed to inspect build output {}: {source}", path.display())]
  Inspect {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// What to compile, and whether dependencies still need fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilePlan {
  /// Run `go get` before building. Module builds resolve dependencies during
  /// normalization instead.
  pub fetch_dependencies: bool,
  pub spec: BuildSpec,
}

impl CompilePlan {
  /// Plan for a handler in `package main`: adapter first, then the entrypoint.
  pub fn default_package(adapter: PathBuf, entrypoint: PathBuf, dest: PathBuf) -> Self {
    Self {
      fetch_dependencies: true,
      spec: BuildSpec {
        src: vec![adapter, entrypoint],
        dest,
      },
    }
  }

  /// Plan for a handler in a named package: only the adapter, which imports
  /// the package through the module.
  pub fn named_package(adapter: PathBuf, dest: PathBuf) -> Self {
    Self {
      fetch_dependencies: false,
      spec: BuildSpec { src: vec![adapter], dest },
    }
  }

  pub fn dest(&self) -> &Path {
    &self.spec.dest
  }
}

/// Resolve dependencies if the plan asks for it, then build the executable.
pub async fn compile(toolchain: &impl Toolchain, plan: &CompilePlan) -> Result<PathBuf, CompileError> {
  if plan.fetch_dependencies {
    toolchain.get().await.map_err(|e| {
      warn!("failed to `go get`");
      CompileError::DependencyResolution {
        diagnostics: e.diagnostics(),
      }
    })?;
  }

  info!(dest = ?plan.dest(), "running `go build`");
  toolchain.build(&plan.spec).await.map_err(|e| {
    warn!("failed to `go build`");
    CompileError::Compile {
      diagnostics: e.diagnostics(),
    }
  })?;

  let built = fs::try_exists(plan.dest())
    .await
    .map_err(|source| CompileError::Inspect {
      path: plan.dest().to_path_buf(),
      source,
    })?;
  if !built {
    return Err(CompileError::MissingExecutable {
      path: plan.dest().to_path_buf(),
    });
  }

  Ok(plan.dest().to_path_buf())
}
