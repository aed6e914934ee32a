use anyhow::Result;
use gobuilder_lib::config::BuilderConfig;
use gobuilder_lib::consts::{ARTIFACT_HANDLER, ARTIFACT_RUNTIME, MAX_LAMBDA_SIZE};

use crate::output::{OutputFormat, print_json, print_stat};

pub fn cmd_info(format: OutputFormat) -> Result<()> {
  let config = BuilderConfig::from_env()?;

  if format.is_json() {
    return print_json(&serde_json::json!({
      "target": config.target.to_string(),
      "runtime": ARTIFACT_RUNTIME,
      "handler": ARTIFACT_HANDLER,
      "maxLambdaSize": MAX_LAMBDA_SIZE,
      "go": config.go_bin,
      "analyzer": config.analyzer_bin,
    }));
  }

  println!("Builder:");
  print_stat("Target", &config.target.to_string());
  print_stat("Runtime", ARTIFACT_RUNTIME);
  print_stat("Max lambda size", MAX_LAMBDA_SIZE);
  print_stat("Go", &config.go_bin.display().to_string());
  print_stat("Analyzer", &config.analyzer_bin.display().to_string());
  Ok(())
}
