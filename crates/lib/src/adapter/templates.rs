//! Adapter source templates.

/// Adapter for handlers declared in `package main`.
/// Contains `__HANDLER_FUNC_NAME`.
pub const MAIN_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/main.go"));

/// Adapter for handlers declared in a named package.
/// Contains `__HANDLER_PACKAGE_NAME` and `__HANDLER_FUNC_NAME`.
pub const MOD_TEMPLATE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/main__mod__.go"));

pub const FUNC_NAME_PLACEHOLDER: &str = "__HANDLER_FUNC_NAME";
pub const PACKAGE_NAME_PLACEHOLDER: &str = "__HANDLER_PACKAGE_NAME";
