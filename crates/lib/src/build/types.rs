use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::compile::CompileError;
use crate::adapter::AdapterError;
use crate::analyze::AnalyzeError;
use crate::module::ModuleSetupError;
use crate::package::{Artifact, IncludeFiles, PackageError};
use crate::workspace::{SourceFileSet, WorkspaceError};

/// Per-build options supplied alongside the files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
  /// Auxiliary files to bundle, matched around the entrypoint.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub include_files: Option<IncludeFiles>,
}

/// Everything needed to build one entrypoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildInput {
  pub files: SourceFileSet,
  pub entrypoint: String,
  #[serde(default)]
  pub config: BuildConfig,
}

/// Artifacts keyed by the entrypoint's logical path.
pub type BuildOutput = BTreeMap<String, Artifact>;

/// Every way a build can fail. All of them abort the build.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error(transparent)]
  Workspace(#[from] WorkspaceError),

  #[error(transparent)]
  Analyze(#[from] AnalyzeError),

  #[error(transparent)]
  TemplateWrite(#[from] AdapterError),

  #[error(transparent)]
  ModuleSetup(#[from] ModuleSetupError),

  #[error(transparent)]
  Compile(#[from] CompileError),

  #[error("failed to package artifact: {0}")]
  Package(#[from] PackageError),
}

impl BuildError {
  /// Raw toolchain output attached to this failure, if any.
  pub fn diagnostics(&self) -> Option<String> {
    match self {
      Self::Compile(CompileError::DependencyResolution { diagnostics })
      | Self::Compile(CompileError::Compile { diagnostics }) => Some(diagnostics.clone()),
      Self::ModuleSetup(ModuleSetupError::Tidy { source, .. }) => Some(source.diagnostics()),
      _ => None,
    }
  }
}
