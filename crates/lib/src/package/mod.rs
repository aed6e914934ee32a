//! Artifact assembly.
//!
//! The artifact is the union of two file trees: auxiliary files matched by
//! `includeFiles` around the entrypoint, and everything in the output root.
//! Output-root entries win on collision.

mod types;

pub use types::*;

use std::collections::BTreeMap;
use std::path::Path;

use globset::GlobBuilder;
use thiserror::Error;
use tracing::{debug, info};

use crate::util::walk::{WalkError, walk_files};

#[derive(Debug, Error)]
pub enum PackageError {
  #[error("invalid includeFiles pattern '{pattern}': {message}")]
  Pattern { pattern: String, message: String },

  #[error(transparent)]
  Walk(#[from] WalkError),
}

/// Match `pattern` against every regular file below `base`.
///
/// Patterns use glob syntax against `/`-separated paths relative to `base`:
/// `*` and `?` stay within one path component and `**` spans directories.
/// Keys are relative to `base`.
pub fn glob(pattern: &str, base: &Path) -> Result<BTreeMap<String, ArtifactFile>, PackageError> {
  let matcher = GlobBuilder::new(pattern)
    .literal_separator(true)
    .build()
    .map_err(|e| PackageError::Pattern {
      pattern: pattern.to_string(),
      message: e.kind().to_string(),
    })?
    .compile_matcher();

  let mut matches = BTreeMap::new();
  for file in walk_files(base)? {
    if matcher.is_match(&file.rel_path) {
      matches.insert(file.rel_path, ArtifactFile {
        fs_path: file.fs_path,
        mode: file.mode,
      });
    }
  }
  Ok(matches)
}

/// Every file below `root`.
pub fn glob_all(root: &Path) -> Result<BTreeMap<String, ArtifactFile>, PackageError> {
  Ok(
    walk_files(root)?
      .into_iter()
      .map(|file| {
        (file.rel_path, ArtifactFile {
          fs_path: file.fs_path,
          mode: file.mode,
        })
      })
      .collect(),
  )
}

/// Collect auxiliary files relative to the entrypoint's directory.
///
/// With several patterns the matches are unioned, later patterns replacing
/// earlier ones on the same path.
pub fn gather_extra_files(
  include_files: Option<&IncludeFiles>,
  entry_fs_path: &Path,
) -> Result<BTreeMap<String, ArtifactFile>, PackageError> {
  let Some(include_files) = include_files else {
    return Ok(BTreeMap::new());
  };

  info!("gathering extra files for the fs");
  let entry_dir = entry_fs_path.parent().unwrap_or(entry_fs_path);

  let mut extra = BTreeMap::new();
  for pattern in include_files.patterns() {
    let matches = glob(pattern, entry_dir)?;
    debug!(pattern = %pattern, count = matches.len(), "matched extra files");
    extra.extend(matches);
  }
  Ok(extra)
}

/// Build the artifact from the output root plus any included files.
pub fn package(
  entry_fs_path: &Path,
  include_files: Option<&IncludeFiles>,
  output_root: &Path,
) -> Result<Artifact, PackageError> {
  let mut files = gather_extra_files(include_files, entry_fs_path)?;
  files.extend(glob_all(output_root)?);

  debug!(count = files.len(), "packaged artifact files");
  Ok(Artifact::new(files))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::consts::{ARTIFACT_HANDLER, ARTIFACT_RUNTIME};
  use tempfile::TempDir;

  fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
  }

  fn keys(files: &BTreeMap<String, ArtifactFile>) -> Vec<&str> {
    files.keys().map(String::as_str).collect()
  }

  #[test]
  fn include_files_accepts_string_or_list() {
    let one: IncludeFiles = serde_json::from_str("\"static/**\"").unwrap();
    assert_eq!(one.patterns(), vec!["static/**"]);

    let many: IncludeFiles = serde_json::from_str("[\"a/*\", \"b.txt\"]").unwrap();
    assert_eq!(many.patterns(), vec!["a/*", "b.txt"]);
  }

  #[test]
  fn glob_matches_relative_to_base() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "templates/index.html", "<html>");
    write(temp.path(), "templates/partials/nav.html", "<nav>");
    write(temp.path(), "index.go", "package main");

    let matches = glob("templates/*.html", temp.path()).unwrap();
    assert_eq!(keys(&matches), vec!["templates/index.html"]);

    let matches = glob("templates/**", temp.path()).unwrap();
    assert_eq!(keys(&matches), vec!["templates/index.html", "templates/partials/nav.html"]);

    let matches = glob("**/*.html", temp.path()).unwrap();
    assert_eq!(keys(&matches), vec!["templates/index.html", "templates/partials/nav.html"]);
  }

  #[test]
  fn star_does_not_cross_directories() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "data.json", "{}");
    write(temp.path(), "nested/secret.json", "{}");

    let matches = glob("*.json", temp.path()).unwrap();
    assert_eq!(keys(&matches), vec!["data.json"]);
  }

  #[test]
  fn bare_directory_name_matches_no_files() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "templates/a.html", "<p>");

    assert!(glob("templates", temp.path()).unwrap().is_empty());
  }

  #[test]
  fn leading_bang_is_an_ordinary_character() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "data.json", "{}");
    write(temp.path(), "!notes.txt", "x");

    assert!(glob("!data.json", temp.path()).unwrap().is_empty());
    assert_eq!(keys(&glob("!*.txt", temp.path()).unwrap()), vec!["!notes.txt"]);
  }

  #[test]
  fn no_include_files_means_no_extras() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "data.json", "{}");

    let extra = gather_extra_files(None, &temp.path().join("index.go")).unwrap();
    assert!(extra.is_empty());
  }

  #[test]
  fn multiple_patterns_are_unioned() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a/one.txt", "1");
    write(temp.path(), "b/two.txt", "2");
    write(temp.path(), "c/three.txt", "3");

    let include = IncludeFiles::Many(vec!["a/**".to_string(), "b/*.txt".to_string()]);
    let extra = gather_extra_files(Some(&include), &temp.path().join("index.go")).unwrap();
    assert_eq!(keys(&extra), vec!["a/one.txt", "b/two.txt"]);
  }

  #[test]
  fn output_root_wins_on_collision() {
    let entry = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(entry.path(), "handler", "not the binary");
    write(entry.path(), "config.yml", "x: 1");
    write(out.path(), "handler", "binary");

    let include = IncludeFiles::Many(vec!["handler".to_string(), "config.yml".to_string()]);
    let artifact = package(&entry.path().join("index.go"), Some(&include), out.path()).unwrap();

    assert_eq!(keys(&artifact.files), vec!["config.yml", "handler"]);
    assert_eq!(artifact.files["handler"].fs_path, out.path().join("handler"));
    assert_eq!(artifact.files["config.yml"].fs_path, entry.path().join("config.yml"));
  }

  #[test]
  fn artifact_has_fixed_handler_and_runtime() {
    let entry = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(out.path(), "handler", "binary");
    write(out.path(), "nested/asset.bin", "bytes");

    let artifact = package(&entry.path().join("index.go"), None, out.path()).unwrap();

    assert_eq!(artifact.handler, ARTIFACT_HANDLER);
    assert_eq!(artifact.runtime, ARTIFACT_RUNTIME);
    assert!(artifact.environment.is_empty());
    assert_eq!(keys(&artifact.files), vec!["handler", "nested/asset.bin"]);
    assert_eq!(artifact.size_bytes().unwrap(), 11);
  }

  #[test]
  fn artifact_serializes_with_wire_names() {
    let mut files = BTreeMap::new();
    files.insert("handler".to_string(), ArtifactFile {
      fs_path: "/out/handler".into(),
      mode: 0o755,
    });
    let json = serde_json::to_value(Artifact::new(files)).unwrap();

    assert_eq!(json["handler"], "handler");
    assert_eq!(json["runtime"], "go1.x");
    assert_eq!(json["environment"], serde_json::json!({}));
    assert_eq!(json["files"]["handler"]["fsPath"], "/out/handler");
    assert_eq!(json["files"]["handler"]["mode"], 0o755);
  }

  #[test]
  fn invalid_pattern_is_reported() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.txt", "x");

    let err = glob("a[", temp.path()).unwrap_err();
    assert!(matches!(err, PackageError::Pattern { pattern, .. } if pattern == "a["));

    let include = IncludeFiles::Many(vec!["*.txt".to_string(), "{a,b".to_string()]);
    let err = package(&temp.path().join("index.go"), Some(&include), temp.path()).unwrap_err();
    assert!(matches!(err, PackageError::Pattern { pattern, .. } if pattern == "{a,b"));
  }
}
