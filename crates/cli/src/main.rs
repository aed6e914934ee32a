mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

/// gobuilder - compile Go handlers into serverless function artifacts
#[derive(Parser)]
#[command(name = "gobuilder")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build one entrypoint of a source directory
  Build(BuildArgs),

  /// Show the target platform and artifact limits
  Info {
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },
}

#[derive(clap::Args)]
struct BuildArgs {
  /// Directory holding the sources to upload
  #[arg(short, long, default_value = ".")]
  dir: PathBuf,

  /// Path of the Go file exporting the handler, relative to --dir
  #[arg(short, long)]
  entrypoint: String,

  /// Glob pattern of extra files to bundle, relative to the entrypoint (repeatable)
  #[arg(short, long = "include")]
  include: Vec<String>,

  /// Target GOOS
  #[arg(long)]
  goos: Option<String>,

  /// Target GOARCH
  #[arg(long)]
  goarch: Option<String>,

  /// Path to the go binary
  #[arg(long)]
  go: Option<PathBuf>,

  /// Path to the exported-function analyzer
  #[arg(long)]
  analyzer: Option<PathBuf>,

  #[arg(long, value_enum, default_value_t)]
  format: OutputFormat,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Build(args) => cmd::cmd_build(cmd::BuildOptions {
      dir: args.dir,
      entrypoint: args.entrypoint,
      include: args.include,
      goos: args.goos,
      goarch: args.goarch,
      go: args.go,
      analyzer: args.analyzer,
      format: args.format,
    }),
    Commands::Info { format } => cmd::cmd_info(format),
  }
}
