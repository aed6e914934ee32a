/// Application name, used for env var prefixes and temp directory names.
pub const APP_NAME: &str = "gobuilder";

/// Package name the Go toolchain compiles directly as a program.
pub const MAIN_PACKAGE: &str = "main";

/// Subpath of the module root that user files are downloaded into.
pub const SOURCE_SUBPATH: &str = "src/lambda";

/// Dependency-module descriptor file name.
pub const GO_MOD_FILE: &str = "go.mod";

/// Adapter file written for handlers declared in `package main`.
///
/// Deliberately not `main.go` so a user file with that name can coexist.
pub const MAIN_ADAPTER_FILE: &str = "main__gobuilder__.go";

/// Adapter file written for handlers declared in a named package.
pub const MOD_ADAPTER_FILE: &str = "main__mod__.go";

/// Adapter file names that user files must not use.
pub const RESERVED_FILE_NAMES: &[&str] = &[MAIN_ADAPTER_FILE, MOD_ADAPTER_FILE];

/// Name of the compiled executable, identical for both strategies.
pub const HANDLER_BINARY: &str = "handler";

/// Handler name recorded in every artifact.
pub const ARTIFACT_HANDLER: &str = "handler";

/// Runtime identifier recorded in every artifact.
pub const ARTIFACT_RUNTIME: &str = "go1.x";

/// Largest artifact the deployment target accepts.
pub const MAX_LAMBDA_SIZE: &str = "10mb";

/// Default unix mode for downloaded files without an explicit mode.
pub const DEFAULT_FILE_MODE: u32 = 0o644;
