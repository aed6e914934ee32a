//! Adapter source synthesis.
//!
//! The adapter provides `func main()` and hands the user's handler to the
//! runtime bridge. It is always written into the entrypoint's directory since
//! `go build` refuses to compile files from different directories together.

mod templates;

pub use templates::{FUNC_NAME_PLACEHOLDER, MAIN_TEMPLATE, MOD_TEMPLATE, PACKAGE_NAME_PLACEHOLDER};

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::debug;

use crate::consts::{MAIN_ADAPTER_FILE, MOD_ADAPTER_FILE};

#[derive(Debug, Error)]
pub enum AdapterError {
  #[error("failed to write adapter {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Render the `package main` adapter calling `function_name`.
pub fn render_main_adapter(function_name: &str) -> String {
  MAIN_TEMPLATE.replace(FUNC_NAME_PLACEHOLDER, function_name)
}

/// Render the named-package adapter importing `import_path` and calling
/// `<package_name>.<function_name>`.
pub fn render_mod_adapter(import_path: &str, package_name: &str, function_name: &str) -> String {
  MOD_TEMPLATE
    .replace(PACKAGE_NAME_PLACEHOLDER, import_path)
    .replace(FUNC_NAME_PLACEHOLDER, &format!("{}.{}", package_name, function_name))
}

/// Write the `package main` adapter into `entry_dir`, returning its path.
pub async fn write_main_adapter(entry_dir: &Path, function_name: &str) -> Result<PathBuf, AdapterError> {
  write_adapter(entry_dir.join(MAIN_ADAPTER_FILE), render_main_adapter(function_name)).await
}

/// Write the named-package adapter into `entry_dir`, returning its path.
pub async fn write_mod_adapter(
  entry_dir: &Path,
  import_path: &str,
  package_name: &str,
  function_name: &str,
) -> Result<PathBuf, AdapterError> {
  write_adapter(
    entry_dir.join(MOD_ADAPTER_FILE),
    render_mod_adapter(import_path, package_name, function_name),
  )
  .await
}

async fn write_adapter(path: PathBuf, contents: String) -> Result<PathBuf, AdapterError> {
  debug!(path = ?path, "writing adapter");
  match fs::write(&path, contents).await {
    Ok(()) => Ok(path),
    Err(source) => Err(AdapterError::Write { path, source }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn templates_carry_their_placeholders() {
    assert!(MAIN_TEMPLATE.contains(FUNC_NAME_PLACEHOLDER));
    assert!(!MAIN_TEMPLATE.contains(PACKAGE_NAME_PLACEHOLDER));
    assert!(MOD_TEMPLATE.contains(FUNC_NAME_PLACEHOLDER));
    assert!(MOD_TEMPLATE.contains(PACKAGE_NAME_PLACEHOLDER));
  }

  #[test]
  fn main_adapter_calls_bare_function() {
    let source = render_main_adapter("Handler");
    assert!(source.starts_with("package main"));
    assert!(source.contains("http.HandlerFunc(Handler)"));
    assert!(!source.contains("__HANDLER"));
  }

  #[test]
  fn mod_adapter_imports_package_and_qualifies_function() {
    let source = render_mod_adapter("mypkg/mypkg", "mypkg", "Run");
    assert!(source.contains("\"mypkg/mypkg\""));
    assert!(source.contains("http.HandlerFunc(mypkg.Run)"));
    assert!(!source.contains("__HANDLER"));
  }

  #[tokio::test]
  async fn main_adapter_does_not_clobber_user_main_go() {
    let temp = TempDir::new().unwrap();
    let user_main = temp.path().join("main.go");
    std::fs::write(&user_main, "package main // user").unwrap();

    let path = write_main_adapter(temp.path(), "Handler").await.unwrap();

    assert_eq!(path, temp.path().join(MAIN_ADAPTER_FILE));
    assert_eq!(std::fs::read_to_string(&user_main).unwrap(), "package main // user");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), render_main_adapter("Handler"));
  }

  #[tokio::test]
  async fn mod_adapter_uses_reserved_name() {
    let temp = TempDir::new().unwrap();
    let path = write_mod_adapter(temp.path(), "foo/bar", "bar", "Serve").await.unwrap();

    assert_eq!(path.file_name().unwrap(), MOD_ADAPTER_FILE);
    assert!(std::fs::read_to_string(&path).unwrap().contains("bar.Serve"));
  }

  #[tokio::test]
  async fn write_into_missing_directory_fails() {
    let temp = TempDir::new().unwrap();
    let err = write_main_adapter(&temp.path().join("gone"), "Handler").await.unwrap_err();
    assert!(matches!(err, AdapterError::Write { .. }));
  }
}
