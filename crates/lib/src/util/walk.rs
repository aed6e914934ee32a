//! Deterministic directory walking.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Error while walking a directory tree.
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
  #[error("failed to walk {path}: {message}")]
  WalkDir { path: String, message: String },

  #[error("failed to read metadata for {path}: {source}")]
  Metadata {
    path: String,
    #[source]
    source: std::io::Error,
  },
}

/// A regular file found under a walked root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
  /// Path relative to the root, `/`-separated.
  pub rel_path: String,
  pub fs_path: PathBuf,
  pub mode: u32,
}

/// List every regular file under `root`, sorted by relative path.
///
/// Symlinks are followed so linked files are packaged by content. Directories
/// and special files are skipped.
pub fn walk_files(root: &Path) -> Result<Vec<WalkedFile>, WalkError> {
  let mut files = Vec::new();

  for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
    let entry = entry.map_err(|e| WalkError::WalkDir {
      path: root.display().to_string(),
      message: e.to_string(),
    })?;

    if !entry.file_type().is_file() {
      continue;
    }

    let entry_path = entry.path();
    let rel_path = relative_slash_path(root, entry_path);
    let metadata = entry.metadata().map_err(|e| WalkError::Metadata {
      path: entry_path.display().to_string(),
      source: e.into(),
    })?;

    files.push(WalkedFile {
      rel_path,
      fs_path: entry_path.to_path_buf(),
      mode: file_mode(&metadata),
    });
  }

  files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
  Ok(files)
}

fn relative_slash_path(root: &Path, path: &Path) -> String {
  let relative = path.strip_prefix(root).unwrap_or(path);
  relative
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}

#[cfg(unix)]
fn file_mode(metadata: &std::fs::Metadata) -> u32 {
  use std::os::unix::fs::PermissionsExt;
  metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn file_mode(metadata: &std::fs::Metadata) -> u32 {
  if metadata.permissions().readonly() { 0o444 } else { 0o644 }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn lists_nested_files_sorted() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("b/c")).unwrap();
    std::fs::write(temp.path().join("b/c/deep.txt"), "d").unwrap();
    std::fs::write(temp.path().join("a.txt"), "a").unwrap();
    std::fs::create_dir_all(temp.path().join("empty")).unwrap();

    let files = walk_files(temp.path()).unwrap();
    let paths: Vec<&str> = files.iter().map(|f| f.rel_path.as_str()).collect();

    assert_eq!(paths, vec!["a.txt", "b/c/deep.txt"]);
    assert_eq!(files[1].fs_path, temp.path().join("b/c/deep.txt"));
  }

  #[test]
  fn missing_root_is_an_error() {
    let temp = TempDir::new().unwrap();
    assert!(walk_files(&temp.path().join("nope")).is_err());
  }
}
