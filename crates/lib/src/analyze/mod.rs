//! Entry analysis.
//!
//! Discovering the exported handler in a Go file is delegated to an external
//! helper; this module owns the contract with it and turns its raw
//! `"<function>,<package>"` answer into a [`HandlerDescriptor`].

use std::future::Future;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Failures of the analyzer itself.
#[derive(Debug, Error)]
pub enum AnalyzerError {
  #[error("failed to run analyzer {}: {source}", bin.display())]
  Spawn {
    bin: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("analyzer exited with code {code:?}: {stderr}")]
  Failed { code: Option<i32>, stderr: String },
}

/// Errors surfaced by [`analyze`].
#[derive(Debug, Error)]
pub enum AnalyzeError {
  #[error("failed to parse AST for \"{entrypoint}\": {source}")]
  Analysis {
    entrypoint: String,
    #[source]
    source: AnalyzerError,
  },

  #[error("analyzer returned malformed result for \"{entrypoint}\": {raw:?}")]
  Malformed { entrypoint: String, raw: String },

  #[error("could not find an exported function in \"{entrypoint}\"")]
  NoHandlerFound { entrypoint: String },
}

/// The exported handler and the package declaring it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDescriptor {
  pub function_name: String,
  pub package_name: String,
}

/// Source of exported-function information for a Go file.
pub trait Analyzer {
  /// Returns `"<function>,<package>"`, or an empty string when the file
  /// exports no handler candidate.
  fn exported_function(&self, path: &Path) -> impl Future<Output = Result<String, AnalyzerError>> + Send;
}

/// Runs an external helper binary as `<bin> <path>` and reads its stdout.
#[derive(Debug, Clone)]
pub struct CommandAnalyzer {
  bin: PathBuf,
}

impl CommandAnalyzer {
  pub fn new(bin: impl Into<PathBuf>) -> Self {
    Self { bin: bin.into() }
  }
}

impl Analyzer for CommandAnalyzer {
  async fn exported_function(&self, path: &Path) -> Result<String, AnalyzerError> {
    debug!(bin = ?self.bin, path = ?path, "running analyzer");

    let output = Command::new(&self.bin)
      .arg(path)
      .output()
      .await
      .map_err(|source| AnalyzerError::Spawn {
        bin: self.bin.clone(),
        source,
      })?;

    if !output.status.success() {
      return Err(AnalyzerError::Failed {
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

/// Discover the handler exported by the entrypoint at `fs_path`.
///
/// `entrypoint` is the logical path, attached to every error for diagnostics.
pub async fn analyze(
  analyzer: &impl Analyzer,
  entrypoint: &str,
  fs_path: &Path,
) -> Result<HandlerDescriptor, AnalyzeError> {
  info!(entrypoint = %entrypoint, "parsing AST");

  let raw = analyzer.exported_function(fs_path).await.map_err(|source| {
    warn!(entrypoint = %entrypoint, "failed to parse AST");
    AnalyzeError::Analysis {
      entrypoint: entrypoint.to_string(),
      source,
    }
  })?;

  let descriptor = parse_descriptor(entrypoint, &raw)?;
  info!(
    entrypoint = %entrypoint,
    function = %descriptor.function_name,
    package = %descriptor.package_name,
    "found exported function"
  );
  Ok(descriptor)
}

fn parse_descriptor(entrypoint: &str, raw: &str) -> Result<HandlerDescriptor, AnalyzeError> {
  let raw = raw.trim();
  let mut fields = raw.split(',').map(str::trim);
  let function_name = fields.next().unwrap_or_default();

  if function_name.is_empty() {
    warn!(entrypoint = %entrypoint, "no exported function");
    return Err(AnalyzeError::NoHandlerFound {
      entrypoint: entrypoint.to_string(),
    });
  }

  match fields.next() {
    Some(package_name) if !package_name.is_empty() => Ok(HandlerDescriptor {
      function_name: function_name.to_string(),
      package_name: package_name.to_string(),
    }),
    _ => Err(AnalyzeError::Malformed {
      entrypoint: entrypoint.to_string(),
      raw: raw.to_string(),
    }),
  }
}
