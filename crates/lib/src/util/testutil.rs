//! Test doubles for the external collaborators.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::analyze::{Analyzer, AnalyzerError};
use crate::toolchain::{BuildSpec, Toolchain, ToolchainError};

/// Analyzer that always gives the same answer.
#[derive(Debug, Clone)]
pub struct StaticAnalyzer {
  answer: Result<String, String>,
}

impl StaticAnalyzer {
  pub fn answer(raw: &str) -> Self {
    Self {
      answer: Ok(raw.to_string()),
    }
  }

  pub fn failing(stderr: &str) -> Self {
    Self {
      answer: Err(stderr.to_string()),
    }
  }
}

impl Analyzer for StaticAnalyzer {
  async fn exported_function(&self, _path: &Path) -> Result<String, AnalyzerError> {
    self.answer.clone().map_err(|stderr| AnalyzerError::Failed { code: Some(1), stderr })
  }
}

/// A toolchain operation as observed by [`RecordingToolchain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolchainCall {
  Get,
  ModTidy,
  Build(BuildSpec),
}

/// Toolchain that records calls and writes a stub executable on build.
#[derive(Debug, Clone, Default)]
pub struct RecordingToolchain {
  calls: Arc<Mutex<Vec<ToolchainCall>>>,
  fail_get: Option<String>,
  fail_tidy: Option<String>,
  fail_build: Option<String>,
}

impl RecordingToolchain {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn fail_get(mut self, diagnostics: &str) -> Self {
    self.fail_get = Some(diagnostics.to_string());
    self
  }

  pub fn fail_tidy(mut self, diagnostics: &str) -> Self {
    self.fail_tidy = Some(diagnostics.to_string());
    self
  }

  pub fn fail_build(mut self, diagnostics: &str) -> Self {
    self.fail_build = Some(diagnostics.to_string());
    self
  }

  pub fn calls(&self) -> Vec<ToolchainCall> {
    self.calls.lock().unwrap().clone()
  }

  fn record(&self, call: ToolchainCall, failure: &Option<String>, command: &str) -> Result<(), ToolchainError> {
    self.calls.lock().unwrap().push(call);
    match failure {
      Some(diagnostics) => Err(ToolchainError::Failed {
        command: command.to_string(),
        code: Some(1),
        diagnostics: diagnostics.clone(),
      }),
      None => Ok(()),
    }
  }
}

impl Toolchain for RecordingToolchain {
  async fn get(&self) -> Result<(), ToolchainError> {
    self.record(ToolchainCall::Get, &self.fail_get, "go get")
  }

  async fn mod_tidy(&self) -> Result<(), ToolchainError> {
    self.record(ToolchainCall::ModTidy, &self.fail_tidy, "go mod tidy")
  }

  async fn build(&self, spec: &BuildSpec) -> Result<(), ToolchainError> {
    self.record(ToolchainCall::Build(spec.clone()), &self.fail_build, "go build")?;
    std::fs::write(&spec.dest, b"\x7fELF stub").map_err(|source| ToolchainError::Spawn {
      bin: PathBuf::from("go"),
      source,
    })
  }
}

/// Write an executable `/bin/sh` script named `name` into `dir`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join(name);
  std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
  std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  path
}
