use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_FILE_MODE, SOURCE_SUBPATH};

/// Errors that can occur while provisioning a build workspace.
#[derive(Debug, Error)]
pub enum WorkspaceError {
  #[error("failed to create writable directory under {}: {source}", root.display())]
  CreateDir {
    root: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("directory acquisition task failed: {0}")]
  Join(String),

  #[error("failed to download '{path}': {source}")]
  Download {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("logical path '{0}' must be relative and stay inside the source tree")]
  InvalidPath(String),

  #[error("'{0}' uses a file name reserved for generated adapters")]
  ReservedName(String),

  #[error("entrypoint '{0}' is not part of the file set")]
  MissingEntrypoint(String),
}

/// Where an input file's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileContent {
  /// Inline file contents.
  Data(String),
  /// An existing file on the local filesystem.
  FsPath(PathBuf),
}

/// A single user file as handed to the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBlob {
  #[serde(flatten)]
  pub content: FileContent,

  /// Unix permission bits; defaults to `0o644`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub mode: Option<u32>,
}

impl FileBlob {
  pub fn data(content: impl Into<String>) -> Self {
    Self {
      content: FileContent::Data(content.into()),
      mode: None,
    }
  }

  pub fn fs_path(path: impl Into<PathBuf>) -> Self {
    Self {
      content: FileContent::FsPath(path.into()),
      mode: None,
    }
  }

  pub fn with_mode(mut self, mode: u32) -> Self {
    self.mode = Some(mode);
    self
  }

  pub fn mode(&self) -> u32 {
    self.mode.unwrap_or(DEFAULT_FILE_MODE)
  }
}

/// User files keyed by logical path.
pub type SourceFileSet = BTreeMap<String, FileBlob>;

/// A user file materialized inside the module root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
  pub logical_path: String,
  pub fs_path: PathBuf,
  pub mode: u32,
}

/// Downloaded files keyed by logical path.
pub type DownloadedFiles = BTreeMap<String, DownloadedFile>;

/// The two per-build directories.
///
/// Both are created fresh for every build and left on disk afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritableWorkspace {
  /// Root handed to the toolchain as `GOPATH`.
  pub module_root: PathBuf,

  /// Directory receiving the compiled executable.
  pub output_root: PathBuf,
}

impl WritableWorkspace {
  /// Directory user files are downloaded into.
  pub fn source_dir(&self) -> PathBuf {
    self.module_root.join(SOURCE_SUBPATH)
  }

  pub fn output_root(&self) -> &Path {
    &self.output_root
  }
}
