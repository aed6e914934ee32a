//! Choosing how a handler gets compiled.

use crate::analyze::HandlerDescriptor;
use crate::consts::MAIN_PACKAGE;

/// The two ways a handler can be turned into a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStrategy {
  /// The handler lives in `package main`; the adapter is compiled next to it.
  DefaultPackage { function_name: String },

  /// The handler lives in another package, which is moved into its own
  /// directory and imported by the adapter through `go.mod`.
  NamedPackage {
    package_name: String,
    function_name: String,
  },
}

impl BuildStrategy {
  /// Pick the strategy for `descriptor` by its package name alone.
  pub fn select(descriptor: &HandlerDescriptor) -> Self {
    if descriptor.package_name == MAIN_PACKAGE {
      Self::DefaultPackage {
        function_name: descriptor.function_name.clone(),
      }
    } else {
      Self::NamedPackage {
        package_name: descriptor.package_name.clone(),
        function_name: descriptor.function_name.clone(),
      }
    }
  }

  pub fn function_name(&self) -> &str {
    match self {
      Self::DefaultPackage { function_name } | Self::NamedPackage { function_name, .. } => function_name,
    }
  }

  /// Whether the toolchain should run in module mode.
  pub fn uses_modules(&self) -> bool {
    matches!(self, Self::NamedPackage { .. })
  }
}
