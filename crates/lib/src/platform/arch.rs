use std::fmt;
use std::str::FromStr;

use super::PlatformError;

/// CPU architectures a handler can be compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
  X86_64,
  Aarch64,
}

impl Arch {
  /// Detect the current CPU architecture at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86_64" => Some(Self::X86_64),
      "aarch64" => Some(Self::Aarch64),
      _ => None,
    }
  }

  /// Returns the `GOARCH` identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86_64 => "amd64",
      Self::Aarch64 => "arm64",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Arch {
  type Err = PlatformError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "amd64" | "x86_64" => Ok(Self::X86_64),
      "arm64" | "aarch64" => Ok(Self::Aarch64),
      other => Err(PlatformError::UnknownArch(other.to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rust_names_map_to_go_names() {
    assert_eq!("x86_64".parse::<Arch>().unwrap().as_str(), "amd64");
    assert_eq!("aarch64".parse::<Arch>().unwrap().as_str(), "arm64");
  }
}
