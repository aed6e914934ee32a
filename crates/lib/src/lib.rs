//! gobuilder-lib: turns an uploaded Go source tree into a deployable
//! serverless function artifact.
//!
//! The pipeline lives in [`build`]; each stage has its own module:
//! - `workspace`: scratch directories and file download
//! - `analyze`: discovering the exported handler
//! - `adapter` and `module`: generating the program entry and `go.mod`
//! - `toolchain`: driving the `go` binary
//! - `package`: assembling the artifact

pub mod adapter;
pub mod analyze;
pub mod build;
pub mod config;
pub mod consts;
pub mod module;
pub mod package;
pub mod platform;
pub mod strategy;
pub mod toolchain;
pub mod util;
pub mod workspace;
