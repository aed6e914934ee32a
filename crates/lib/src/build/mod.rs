//! Build orchestration.
//!
//! A build runs strictly in sequence, each stage consuming what the previous
//! one left on disk:
//!
//! 1. provision the module and output roots and download the user files
//! 2. ask the analyzer for the exported handler
//! 3. pick a [`BuildStrategy`]
//! 4. write the adapter (and, for named packages, normalize the module)
//! 5. resolve dependencies and compile to `<output root>/handler`
//! 6. package the output root and any included files
//!
//! Any failure aborts the build. Provisioned directories are left in place.

pub mod compile;
mod types;

pub use types::*;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::adapter::{write_main_adapter, write_mod_adapter};
use crate::analyze::{Analyzer, CommandAnalyzer, analyze};
use crate::config::BuilderConfig;
use crate::consts::HANDLER_BINARY;
use crate::module;
use crate::package::package;
use crate::platform::Target;
use crate::strategy::BuildStrategy;
use crate::toolchain::{GoToolchain, Toolchain};
use crate::workspace::{WorkspaceError, provision};
use compile::{CompilePlan, compile};

/// Where and how a toolchain for one build should operate.
#[derive(Debug, Clone)]
pub struct ToolchainScope {
  /// Module root, used as `GOPATH`.
  pub gopath: PathBuf,
  /// The entrypoint's directory.
  pub cwd: PathBuf,
  pub target: Target,
  /// Whether the build goes through `go.mod`.
  pub modules: bool,
}

/// Build `input` with the analyzer and `go` binary named in `config`.
pub async fn build(input: &BuildInput, config: &BuilderConfig) -> Result<BuildOutput, BuildError> {
  let analyzer = CommandAnalyzer::new(&config.analyzer_bin);
  let go_bin = config.go_bin.clone();

  build_with(input, config, &analyzer, move |scope| {
    GoToolchain::new(go_bin, &scope.gopath, scope.target, &scope.cwd, scope.modules)
  })
  .await
}

/// Build `input` with explicit collaborators.
///
/// `make_toolchain` is called once, after the strategy is known.
pub async fn build_with<A, T, F>(
  input: &BuildInput,
  config: &BuilderConfig,
  analyzer: &A,
  make_toolchain: F,
) -> Result<BuildOutput, BuildError>
where
  A: Analyzer,
  T: Toolchain,
  F: FnOnce(&ToolchainScope) -> T,
{
  let entrypoint = input.entrypoint.as_str();
  if !input.files.contains_key(entrypoint) {
    return Err(WorkspaceError::MissingEntrypoint(entrypoint.to_string()).into());
  }

  let (workspace, downloaded) = provision(&input.files, &config.temp_root).await?;
  let entry = downloaded
    .get(entrypoint)
    .ok_or_else(|| WorkspaceError::MissingEntrypoint(entrypoint.to_string()))?;

  let descriptor = analyze(analyzer, entrypoint, &entry.fs_path).await?;
  let strategy = BuildStrategy::select(&descriptor);

  let entry_dir = entry_dir(&entry.fs_path)?;
  let scope = ToolchainScope {
    gopath: workspace.module_root.clone(),
    cwd: entry_dir.to_path_buf(),
    target: config.target,
    modules: strategy.uses_modules(),
  };
  let toolchain = make_toolchain(&scope);
  let dest = workspace.output_root.join(HANDLER_BINARY);

  let plan = match &strategy {
    BuildStrategy::DefaultPackage { function_name } => {
      let adapter = write_main_adapter(entry_dir, function_name).await?;
      CompilePlan::default_package(adapter, entry.fs_path.clone(), dest)
    }
    BuildStrategy::NamedPackage {
      package_name,
      function_name,
    } => {
      let resolved = module::ensure_descriptor(entry_dir, package_name).await?;
      info!(
        module = %resolved.descriptor.module_path,
        import_path = %resolved.import_path,
        created = !resolved.pre_existing,
        "resolved handler module"
      );
      let adapter = write_mod_adapter(entry_dir, &resolved.import_path, package_name, function_name).await?;
      module::relocate_entry(&entry.fs_path, entry_dir, package_name, entrypoint).await?;
      module::tidy(&toolchain).await?;
      CompilePlan::named_package(adapter, dest)
    }
  };

  let executable = compile(&toolchain, &plan).await?;
  info!(entrypoint = %entrypoint, executable = ?executable, target = %config.target, "compiled handler");

  let artifact = package(&entry.fs_path, input.config.include_files.as_ref(), workspace.output_root())?;

  let mut output = BuildOutput::new();
  output.insert(entrypoint.to_string(), artifact);
  Ok(output)
}

fn entry_dir(entry_fs_path: &Path) -> Result<&Path, WorkspaceError> {
  entry_fs_path
    .parent()
    .ok_or_else(|| WorkspaceError::InvalidPath(entry_fs_path.display().to_string()))
}
