mod build;
mod info;

pub use build::{BuildOptions, cmd_build};
pub use info::cmd_info;
