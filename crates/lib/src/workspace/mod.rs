//! Per-build workspace provisioning.
//!
//! A build gets two fresh directories: the module root, which doubles as the
//! toolchain's `GOPATH` and receives the user files under `src/lambda/`, and
//! the output root, which receives the compiled executable. Neither is
//! cleaned up here.

mod types;

pub use types::*;

use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::consts::{APP_NAME, RESERVED_FILE_NAMES};

/// Create the module and output roots concurrently, then download `files`
/// into the module root.
///
/// Fails without handing back partial state; whatever was already written
/// stays on disk but is unreachable to later stages.
pub async fn provision(
  files: &SourceFileSet,
  temp_root: &Path,
) -> Result<(WritableWorkspace, DownloadedFiles), WorkspaceError> {
  info!(count = files.len(), "downloading user files");

  let (module_root, output_root) = tokio::try_join!(
    acquire_writable_dir(temp_root, "module"),
    acquire_writable_dir(temp_root, "out"),
  )?;

  let workspace = WritableWorkspace {
    module_root,
    output_root,
  };
  debug!(module_root = ?workspace.module_root, output_root = ?workspace.output_root, "workspace ready");

  let downloaded = download(files, &workspace.source_dir()).await?;
  Ok((workspace, downloaded))
}

/// Create a uniquely named directory under `root` that outlives this process's
/// handle to it.
pub async fn acquire_writable_dir(root: &Path, label: &str) -> Result<PathBuf, WorkspaceError> {
  let root = root.to_path_buf();
  let prefix = format!("{}-{}-", APP_NAME, label);

  tokio::task::spawn_blocking(move || {
    tempfile::Builder::new()
      .prefix(&prefix)
      .tempdir_in(&root)
      .map(|dir| dir.keep())
      .map_err(|source| WorkspaceError::CreateDir { root, source })
  })
  .await
  .map_err(|e| WorkspaceError::Join(e.to_string()))?
}

/// Materialize every file of `files` under `dest`, preserving logical paths.
pub async fn download(files: &SourceFileSet, dest: &Path) -> Result<DownloadedFiles, WorkspaceError> {
  let mut downloaded = DownloadedFiles::new();

  for (logical_path, blob) in files {
    let relative = validate_logical_path(logical_path)?;
    let fs_path = dest.join(relative);

    if let Some(parent) = fs_path.parent() {
      fs::create_dir_all(parent)
        .await
        .map_err(|source| download_error(logical_path, source))?;
    }

    let written = match &blob.content {
      FileContent::Data(data) => fs::write(&fs_path, data).await,
      FileContent::FsPath(src) => fs::copy(src, &fs_path).await.map(|_| ()),
    };
    written.map_err(|source| download_error(logical_path, source))?;

    let mode = blob.mode();
    set_mode(&fs_path, mode)
      .await
      .map_err(|source| download_error(logical_path, source))?;

    debug!(path = %logical_path, fs_path = ?fs_path, "downloaded");
    downloaded.insert(
      logical_path.clone(),
      DownloadedFile {
        logical_path: logical_path.clone(),
        fs_path,
        mode,
      },
    );
  }

  Ok(downloaded)
}

/// Reject absolute paths, `..` segments and adapter file names.
fn validate_logical_path(logical_path: &str) -> Result<PathBuf, WorkspaceError> {
  let path = Path::new(logical_path);
  let mut relative = PathBuf::new();

  for component in path.components() {
    match component {
      Component::Normal(part) => relative.push(part),
      Component::CurDir => {}
      _ => return Err(WorkspaceError::InvalidPath(logical_path.to_string())),
    }
  }

  let Some(file_name) = relative.file_name().and_then(|n| n.to_str()) else {
    return Err(WorkspaceError::InvalidPath(logical_path.to_string()));
  };
  if RESERVED_FILE_NAMES.contains(&file_name) {
    return Err(WorkspaceError::ReservedName(logical_path.to_string()));
  }

  Ok(relative)
}

fn download_error(logical_path: &str, source: std::io::Error) -> WorkspaceError {
  WorkspaceError::Download {
    path: logical_path.to_string(),
    source,
  }
}

#[cfg(unix)]
async fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
  use std::os::unix::fs::PermissionsExt;
  fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await
}

#[cfg(not(unix))]
async fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
  Ok(())
}
