/// The `module` directive of a `go.mod` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
  /// Root import path declared by the module.
  pub module_path: String,
}

impl ModuleDescriptor {
  /// Minimal descriptor for a package that ships without one.
  pub fn synthesize(package_name: &str) -> Self {
    Self {
      module_path: package_name.to_string(),
    }
  }

  /// Read the module path from the first line of `contents`.
  ///
  /// Returns `None` unless that line is `module <path>`.
  pub fn parse(contents: &str) -> Option<Self> {
    let first_line = contents.lines().next()?;
    let mut tokens = first_line.split_whitespace();
    if tokens.next()? != "module" {
      return None;
    }
    let module_path = tokens.next()?.trim_matches('"');
    if module_path.is_empty() {
      return None;
    }
    Some(Self {
      module_path: module_path.to_string(),
    })
  }

  /// Fully-qualified import path of `package_name` inside this module.
  pub fn import_path(&self, package_name: &str) -> String {
    format!("{}/{}", self.module_path, package_name)
  }

  /// File contents for a freshly synthesized descriptor.
  pub fn render(&self) -> String {
    format!("module {}", self.module_path)
  }
}
