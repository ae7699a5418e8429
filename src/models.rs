//! Data structures exchanged between the registrar, the copy plugin and the host build tool.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mapping from a compile-time constant name to the public path it stands for.
pub type DefineMap = BTreeMap<String, String>;

/// Package metadata read from a module's `package.json`.
///
/// Only `version` is interpreted by the crate itself. The full object is handed to custom
/// public path resolvers untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ModulePackage(Map<String, Value>);

impl ModulePackage {
  /// Wrap an already parsed JSON object.
  pub fn new(fields: Map<String, Value>) -> Self {
    Self(fields)
  }

  /// Declared package name, if any.
  pub fn name(&self) -> Option<&str> {
    self.0.get("name").and_then(Value::as_str)
  }

  /// Declared package version as written.
  ///
  /// Strings are borrowed; numbers and other scalars are rendered with their JSON text.
  /// An absent or `null` field yields `None`.
  pub fn version(&self) -> Option<Cow<'_, str>> {
    match self.0.get("version")? {
      Value::Null => None,
      Value::String(version) => Some(Cow::Borrowed(version)),
      other => Some(Cow::Owned(other.to_string())),
    }
  }

  /// Look up an arbitrary top-level field.
  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  /// Borrow the underlying JSON object.
  pub fn fields(&self) -> &Map<String, Value> {
    &self.0
  }
}

impl From<Map<String, Value>> for ModulePackage {
  fn from(fields: Map<String, Value>) -> Self {
    Self(fields)
  }
}

/// A single copy rule handed to the copy plugin.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyTarget {
  /// Source path or glob pattern.
  pub src: String,
  /// Destination directory relative to the build output.
  pub dest: String,
  /// Optional file name override for the copied file.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rename: Option<String>,
}

impl CopyTarget {
  /// Create a copy rule without a rename.
  pub fn new(src: impl Into<String>, dest: impl Into<String>) -> Self {
    Self {
      src: src.into(),
      dest: dest.into(),
      rename: None,
    }
  }

  /// Set the file name override.
  pub fn with_rename(mut self, rename: impl Into<String>) -> Self {
    self.rename = Some(rename.into());
    self
  }
}

/// Options passed to the copy plugin factory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StaticCopyOptions {
  /// Every copy rule gathered from the registered modules, in registration order.
  pub targets: Vec<CopyTarget>,
}

/// Build tool command a configuration pass runs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigCommand {
  /// Production build.
  Build,
  /// Development server.
  Serve,
}

/// Environment the host passes alongside the configuration object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConfigEnv {
  /// Command being executed.
  pub command: ConfigCommand,
  /// Mode name, e.g. `production`.
  pub mode: String,
}

impl ConfigEnv {
  /// Environment for a production build.
  pub fn build() -> Self {
    Self {
      command: ConfigCommand::Build,
      mode: "production".into(),
    }
  }

  /// Environment for a development server.
  pub fn serve() -> Self {
    Self {
      command: ConfigCommand::Serve,
      mode: "development".into(),
    }
  }
}

/// Host configuration object handed to `config` hooks.
///
/// `define` holds compile-time replacements where each value is source text, so string
/// constants are stored JSON-encoded. Fields this crate does not care about are kept in
/// `rest`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UserConfig {
  /// Global compile-time replacements.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub define: Option<Map<String, Value>>,
  /// Remaining configuration fields.
  #[serde(flatten)]
  pub rest: Map<String, Value>,
}
