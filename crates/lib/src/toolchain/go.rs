//! `go` command execution.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info};

use super::{BuildSpec, Toolchain, ToolchainError};
use crate::platform::Target;

/// Runs the `go` binary in a fixed working directory for a fixed target.
#[derive(Debug, Clone)]
pub struct GoToolchain {
  bin: PathBuf,
  cwd: PathBuf,
  env: BTreeMap<String, String>,
}

impl GoToolchain {
  /// Create a toolchain rooted at `gopath`, working in `cwd`.
  ///
  /// `modules` switches `GO111MODULE` on; without it the toolchain resolves
  /// imports through `GOPATH`.
  pub fn new(bin: impl Into<PathBuf>, gopath: &Path, target: Target, cwd: &Path, modules: bool) -> Self {
    let mut env = BTreeMap::new();
    env.insert("GOOS".to_string(), target.goos().to_string());
    env.insert("GOARCH".to_string(), target.goarch().to_string());
    env.insert("GOPATH".to_string(), gopath.to_string_lossy().to_string());
    env.insert("GO111MODULE".to_string(), if modules { "on" } else { "off" }.to_string());
    env.insert("CGO_ENABLED".to_string(), "0".to_string());

    Self {
      bin: bin.into(),
      cwd: cwd.to_path_buf(),
      env,
    }
  }

  /// Environment the toolchain runs with, on top of the inherited one.
  pub fn env(&self) -> &BTreeMap<String, String> {
    &self.env
  }

  pub fn cwd(&self) -> &Path {
    &self.cwd
  }

  async fn run(&self, args: Vec<OsString>) -> Result<(), ToolchainError> {
    let command = describe(&args);
    info!(cmd = %command, cwd = ?self.cwd, "running go");

    let output = Command::new(&self.bin)
      .args(&args)
      .current_dir(&self.cwd)
      .envs(&self.env)
      .output()
      .await
      .map_err(|source| ToolchainError::Spawn {
        bin: self.bin.clone(),
        source,
      })?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    if !output.status.success() {
      debug!(stderr = %stderr, stdout = %stdout, "go failed");

      let mut diagnostics = stderr.trim_end().to_string();
      if !stdout.trim().is_empty() {
        if !diagnostics.is_empty() {
          diagnostics.push('\n');
        }
        diagnostics.push_str(stdout.trim_end());
      }

      return Err(ToolchainError::Failed {
        command,
        code: output.status.code(),
        diagnostics,
      });
    }

    if !stdout.trim().is_empty() {
      debug!(stdout = %stdout.trim(), "go output");
    }
    Ok(())
  }
}

impl Toolchain for GoToolchain {
  async fn get(&self) -> Result<(), ToolchainError> {
    self.run(vec!["get".into()]).await
  }

  async fn mod_tidy(&self) -> Result<(), ToolchainError> {
    self.run(vec!["mod".into(), "tidy".into()]).await
  }

  async fn build(&self, spec: &BuildSpec) -> Result<(), ToolchainError> {
    let mut args: Vec<OsString> = vec![
      "build".into(),
      "-ldflags".into(),
      "-s -w".into(),
      "-o".into(),
      spec.dest.clone().into(),
    ];
    args.extend(spec.src.iter().map(|src| src.clone().into_os_string()));
    self.run(args).await
  }
}

fn describe(args: &[OsString]) -> String {
  let mut parts = vec!["go".to_string()];
  parts.extend(args.iter().map(|a| a.to_string_lossy().to_string()));
  parts.join(" ")
}
