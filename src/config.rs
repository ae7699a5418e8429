//! Declarative module list loaded from a project configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::descriptor::ModuleDescriptor;
use crate::models::CopyTarget;
use crate::resolver::PACKAGE_MANIFEST;
use crate::template::render_template;

const CONFIG_FILE_CANDIDATES: [&str; 3] = [
  "static-copy.modules.json",
  "static-copy.modules.yaml",
  "static-copy.modules.yml",
];

/// Discoverable configuration listing the modules whose assets should be staged.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModulesConfig {
  /// Directory module resolution starts from, relative to the configuration file.
  pub root: String,
  /// Modules in registration order.
  pub modules: Vec<ModuleEntryConfig>,
}

impl Default for ModulesConfig {
  fn default() -> Self {
    Self {
      root: ".".into(),
      modules: Vec::new(),
    }
  }
}

/// One module entry of the configuration file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleEntryConfig {
  /// Installed module name.
  pub module_name: String,
  /// Constant name bound to the module's public path.
  #[serde(default)]
  pub define: Option<String>,
  /// File inside the module used to locate its root directory.
  #[serde(default)]
  pub find_module_path_by: Option<String>,
  /// Public path template; `{name}` and `{version}` are available.
  #[serde(default)]
  pub public_path: Option<String>,
  /// Copy rule templates; `{modulePath}` and `{publicPath}` are available.
  #[serde(default)]
  pub targets: Vec<CopyTarget>,
}

impl ModulesConfig {
  /// Look for a configuration file in `dir`.
  ///
  /// Returns the default (empty) configuration together with `None` when no candidate
  /// file exists.
  pub fn discover(dir: &Path) -> Result<(Self, Option<PathBuf>)> {
    for candidate in CONFIG_FILE_CANDIDATES {
      let path = dir.join(candidate);
      if path.is_file() {
        return Ok((Self::from_path(&path)?, Some(path)));
      }
    }
    Ok((Self::default(), None))
  }

  /// Read configuration from a specific JSON or YAML file.
  pub fn from_path(path: &Path) -> Result<Self> {
    let content =
      fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let is_yaml = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
      serde_yaml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    } else {
      serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
  }

  /// Directory resolution should start from, given the directory holding the config.
  pub fn root_dir(&self, config_dir: &Path) -> PathBuf {
    config_dir.join(&self.root)
  }

  /// Convert the configured entries into module descriptors.
  pub fn into_descriptors(self) -> Vec<ModuleDescriptor> {
    self
      .modules
      .into_iter()
      .map(ModuleEntryConfig::into_descriptor)
      .collect()
  }
}

impl ModuleEntryConfig {
  /// Convert this entry into a descriptor with template-driven callbacks.
  pub fn into_descriptor(self) -> ModuleDescriptor {
    let templates = self.targets;
    let mut descriptor = ModuleDescriptor::new(self.module_name, move |module_path, public_path| {
      templates
        .iter()
        .map(|template| render_target(template, module_path, public_path))
        .collect()
    });

    descriptor.define = self.define;
    descriptor.find_module_path_by = self
      .find_module_path_by
      .unwrap_or_else(|| PACKAGE_MANIFEST.to_string());

    if let Some(public_path) = self.public_path {
      descriptor = descriptor.public_path_resolver(move |name, package| {
        let version = package.version();
        render_template(&public_path, |key| match key {
          "name" => Some(name),
          "version" => version.as_deref(),
          _ => None,
        })
      });
    }

    descriptor
  }
}

fn render_target(template: &CopyTarget, module_path: &str, public_path: &str) -> Result<CopyTarget> {
  let lookup = |key: &str| match key {
    "modulePath" => Some(module_path),
    "publicPath" => Some(public_path),
    _ => None,
  };

  Ok(CopyTarget {
    src: render_template(&template.src, lookup)?,
    dest: render_template(&template.dest, lookup)?,
    rename: template
      .rename
      .as_deref()
      .map(|rename| render_template(rename, lookup))
      .transpose()?,
  })
}
