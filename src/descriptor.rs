//! Caller-supplied description of one module whose assets should be staged.

use std::fmt;

use crate::models::{CopyTarget, ModulePackage};
use crate::resolver::PACKAGE_MANIFEST;

/// Produces copy rules from `(module_path, public_path)`.
pub type TargetsFn = Box<dyn Fn(&str, &str) -> anyhow::Result<Vec<CopyTarget>> + Send + Sync>;

/// Computes a public path from `(module_name, package)`.
pub type PublicPathFn =
  Box<dyn Fn(&str, &ModulePackage) -> anyhow::Result<String> + Send + Sync>;

/// Describes how one installed module's assets are staged and exposed.
pub struct ModuleDescriptor {
  /// Name the module is installed under, e.g. `@scope/pkg`.
  pub module_name: String,
  /// Constant name bound to the module's public path.
  pub define: Option<String>,
  /// File inside the module used to locate its root directory.
  pub find_module_path_by: String,
  /// Copy rule factory.
  pub targets: TargetsFn,
  /// Replaces the default public path derivation when set.
  pub public_path_resolver: Option<PublicPathFn>,
}

impl ModuleDescriptor {
  /// Describe a module located through its `package.json`.
  pub fn new<F>(module_name: impl Into<String>, targets: F) -> Self
  where
    F: Fn(&str, &str) -> anyhow::Result<Vec<CopyTarget>> + Send + Sync + 'static,
  {
    Self {
      module_name: module_name.into(),
      define: None,
      find_module_path_by: PACKAGE_MANIFEST.to_string(),
      targets: Box::new(targets),
      public_path_resolver: None,
    }
  }

  /// Bind the module's public path to a constant.
  pub fn define(mut self, name: impl Into<String>) -> Self {
    self.define = Some(name.into());
    self
  }

  /// Locate the module root through a different file.
  pub fn find_module_path_by(mut self, relative_file: impl Into<String>) -> Self {
    self.find_module_path_by = relative_file.into();
    self
  }

  /// Derive the public path with a custom function.
  pub fn public_path_resolver<F>(mut self, resolver: F) -> Self
  where
    F: Fn(&str, &ModulePackage) -> anyhow::Result<String> + Send + Sync + 'static,
  {
    self.public_path_resolver = Some(Box::new(resolver));
    self
  }

  /// Request string used to locate the module root marker.
  pub fn marker_request(&self) -> String {
    format!("{}/{}", self.module_name, self.find_module_path_by)
  }
}

impl fmt::Debug for ModuleDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ModuleDescriptor")
      .field("module_name", &self.module_name)
      .field("define", &self.define)
      .field("find_module_path_by", &self.find_module_path_by)
      .field("public_path_resolver", &self.public_path_resolver.is_some())
      .finish_non_exhaustive()
  }
}
