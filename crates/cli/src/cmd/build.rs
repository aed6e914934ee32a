//! Implementation of the `gobuilder build` command.
//!
//! Uploads every file under `--dir` (skipping `.git`) as the build's file set,
//! runs the pipeline and reports the resulting artifact.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use walkdir::WalkDir;

use gobuilder_lib::build::{BuildConfig, BuildInput, build};
use gobuilder_lib::config::BuilderConfig;
use gobuilder_lib::package::IncludeFiles;
use gobuilder_lib::platform::Target;
use gobuilder_lib::workspace::{FileBlob, SourceFileSet};

use crate::output::{
  OutputFormat, format_bytes, format_duration, print_error, print_info, print_json, print_stat, print_success,
};

pub struct BuildOptions {
  pub dir: PathBuf,
  pub entrypoint: String,
  pub include: Vec<String>,
  pub goos: Option<String>,
  pub goarch: Option<String>,
  pub go: Option<PathBuf>,
  pub analyzer: Option<PathBuf>,
  pub format: OutputFormat,
}

pub fn cmd_build(opts: BuildOptions) -> Result<()> {
  let config = builder_config(&opts)?;
  let files = collect_files(&opts.dir)?;

  let input = BuildInput {
    files,
    entrypoint: opts.entrypoint,
    config: BuildConfig {
      include_files: include_files(opts.include),
    },
  };

  if !opts.format.is_json() {
    print_info(&format!(
      "Building {} for {} ({} files)",
      input.entrypoint,
      config.target,
      input.files.len()
    ));
  }

  let start = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let output = match rt.block_on(build(&input, &config)) {
    Ok(output) => output,
    Err(err) => {
      if opts.format.is_json() {
        print_json(&serde_json::json!({
          "error": err.to_string(),
          "diagnostics": err.diagnostics(),
        }))?;
      } else {
        print_error(&format!("Build failed: {}", err));
      }
      return Err(err.into());
    }
  };

  if opts.format.is_json() {
    return print_json(&output);
  }

  print_success(&format!("Built in {}", format_duration(start.elapsed())));
  for (entrypoint, artifact) in &output {
    let size = artifact.size_bytes().context("Failed to measure artifact")?;
    println!();
    println!("{}:", entrypoint);
    print_stat("Handler", &artifact.handler);
    print_stat("Runtime", &artifact.runtime);
    print_stat("Size", &format_bytes(size));
    for (path, file) in &artifact.files {
      print_stat(path, &file.fs_path.display().to_string());
    }
  }
  Ok(())
}

fn builder_config(opts: &BuildOptions) -> Result<BuilderConfig> {
  let mut config = BuilderConfig::from_env()?;

  if let Some(go) = &opts.go {
    config.go_bin = go.clone();
  }
  if let Some(analyzer) = &opts.analyzer {
    config.analyzer_bin = analyzer.clone();
  }
  let goos = opts.goos.as_deref().unwrap_or(config.target.goos());
  let goarch = opts.goarch.as_deref().unwrap_or(config.target.goarch());
  config.target = Target::parse(goos, goarch)?;
  Ok(config)
}

fn include_files(mut patterns: Vec<String>) -> Option<IncludeFiles> {
  match patterns.len() {
    0 => None,
    1 => patterns.pop().map(IncludeFiles::One),
    _ => Some(IncludeFiles::Many(patterns)),
  }
}

/// Every regular file below `dir`, keyed by its `/`-separated relative path.
fn collect_files(dir: &Path) -> Result<SourceFileSet> {
  if !dir.is_dir() {
    bail!("Source directory not found: {}", dir.display());
  }

  let mut files = SourceFileSet::new();
  let walker = WalkDir::new(dir)
    .follow_links(true)
    .into_iter()
    .filter_entry(|e| e.file_name() != ".git");

  for entry in walker {
    let entry = entry.with_context(|| format!("Failed to read {}", dir.display()))?;
    if !entry.file_type().is_file() {
      continue;
    }

    let rel = entry
      .path()
      .strip_prefix(dir)
      .context("Walked outside the source directory")?;
    let logical = rel
      .components()
      .map(|c| c.as_os_str().to_string_lossy())
      .collect::<Vec<_>>()
      .join("/");

    let mut blob = FileBlob::fs_path(entry.path());
    if let Some(mode) = file_mode(&entry)? {
      blob = blob.with_mode(mode);
    }
    files.insert(logical, blob);
  }
  Ok(files)
}

#[cfg(unix)]
fn file_mode(entry: &walkdir::DirEntry) -> Result<Option<u32>> {
  use std::os::unix::fs::PermissionsExt;
  let metadata = entry.metadata().context("Failed to read file metadata")?;
  Ok(Some(metadata.permissions().mode() & 0o777))
}

#[cfg(not(unix))]
fn file_mode(_entry: &walkdir::DirEntry) -> Result<Option<u32>> {
  Ok(None)
}

#[cfg(test)]
mod tests {
  use super::*;
  use gobuilder_lib::workspace::FileContent;
  use tempfile::TempDir;

  #[test]
  fn collect_files_skips_git_and_uses_slash_paths() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("api/v1")).unwrap();
    std::fs::create_dir_all(temp.path().join(".git")).unwrap();
    std::fs::write(temp.path().join("api/v1/index.go"), "package main").unwrap();
    std::fs::write(temp.path().join(".git/HEAD"), "ref").unwrap();
    std::fs::write(temp.path().join("go.mod"), "module app").unwrap();

    let files = collect_files(temp.path()).unwrap();

    let keys: Vec<&str> = files.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["api/v1/index.go", "go.mod"]);
    assert_eq!(files["go.mod"].content, FileContent::FsPath(temp.path().join("go.mod")));
  }

  #[test]
  fn collect_files_requires_directory() {
    let temp = TempDir::new().unwrap();
    assert!(collect_files(&temp.path().join("missing")).is_err());
  }

  #[test]
  #[serial_test::serial]
  fn target_flags_override_environment() {
    let opts = BuildOptions {
      dir: PathBuf::from("."),
      entrypoint: "index.go".to_string(),
      include: vec![],
      goos: Some("darwin".to_string()),
      goarch: Some("arm64".to_string()),
      go: None,
      analyzer: None,
      format: OutputFormat::Text,
    };

    let config = builder_config(&opts).unwrap();
    assert_eq!(config.target.to_string(), "darwin/arm64");

    let bad = BuildOptions {
      goarch: Some("sparc".to_string()),
      ..opts
    };
    assert!(builder_config(&bad).is_err());
  }

  #[test]
  fn include_flags_map_to_include_files() {
    assert_eq!(include_files(vec![]), None);
    assert_eq!(
      include_files(vec!["static/**".to_string()]),
      Some(IncludeFiles::One("static/**".to_string()))
    );
    assert_eq!(
      include_files(vec!["a".to_string(), "b".to_string()]),
      Some(IncludeFiles::Many(vec!["a".to_string(), "b".to_string()]))
    );
  }
}
