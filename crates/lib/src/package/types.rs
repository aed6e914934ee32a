use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{ARTIFACT_HANDLER, ARTIFACT_RUNTIME};

/// `includeFiles`: one glob pattern or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IncludeFiles {
  One(String),
  Many(Vec<String>),
}

impl IncludeFiles {
  pub fn patterns(&self) -> Vec<&str> {
    match self {
      Self::One(pattern) => vec![pattern.as_str()],
      Self::Many(patterns) => patterns.iter().map(String::as_str).collect(),
    }
  }
}

/// A file inside an artifact, referenced by its location on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactFile {
  pub fs_path: PathBuf,
  pub mode: u32,
}

/// Deployable description of one compiled handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
  pub files: BTreeMap<String, ArtifactFile>,
  pub handler: String,
  pub runtime: String,
  pub environment: BTreeMap<String, String>,
}

impl Artifact {
  /// Artifact over `files` with the fixed handler and runtime.
  pub fn new(files: BTreeMap<String, ArtifactFile>) -> Self {
    Self {
      files,
      handler: ARTIFACT_HANDLER.to_string(),
      runtime: ARTIFACT_RUNTIME.to_string(),
      environment: BTreeMap::new(),
    }
  }

  /// Total size of all referenced files.
  pub fn size_bytes(&self) -> std::io::Result<u64> {
    self
      .files
      .values()
      .try_fold(0, |total, file| Ok(total + std::fs::metadata(&file.fs_path)?.len()))
  }
}
