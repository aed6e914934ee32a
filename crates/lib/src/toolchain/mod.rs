//! The Go toolchain collaborator.
//!
//! [`Toolchain`] is the seam between orchestration and the actual compiler:
//! dependency fetch, module tidy and build, each blocking from the caller's
//! point of view. [`GoToolchain`] drives a real `go` binary.

mod go;

pub use go::GoToolchain;

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from running a toolchain step.
#[derive(Debug, Error)]
pub enum ToolchainError {
  #[error("failed to run {}: {source}", bin.display())]
  Spawn {
    bin: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The step ran and failed; `diagnostics` is the tool's own output.
  #[error("`{command}` exited with code {code:?}:\n{diagnostics}")]
  Failed {
    command: String,
    code: Option<i32>,
    diagnostics: String,
  },
}

impl ToolchainError {
  /// Raw text to show the end user for this failure.
  pub fn diagnostics(&self) -> String {
    match self {
      Self::Failed { diagnostics, .. } => diagnostics.clone(),
      Self::Spawn { .. } => self.to_string(),
    }
  }
}

/// Sources to compile and where the executable goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSpec {
  /// Source files, passed to the compiler in this order.
  pub src: Vec<PathBuf>,
  pub dest: PathBuf,
}

/// Operations the build needs from the Go toolchain.
pub trait Toolchain {
  /// Fetch every non-stdlib import of the working directory's sources.
  fn get(&self) -> impl Future<Output = Result<(), ToolchainError>> + Send;

  /// Reconcile `go.mod` with the imports actually used.
  fn mod_tidy(&self) -> impl Future<Output = Result<(), ToolchainError>> + Send;

  /// Compile `spec.src` into the executable `spec.dest`.
  fn build(&self, spec: &BuildSpec) -> impl Future<Output = Result<(), ToolchainError>> + Send;
}
