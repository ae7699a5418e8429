//! Error types raised while locating modules and reading their package metadata.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by a [`crate::resolver::ModuleResolver`] or the default public path
/// resolver.
#[derive(Debug, Error)]
pub enum ResolveError {
  /// No installed module provides the requested file.
  #[error("cannot find module '{request}'")]
  ModuleNotFound {
    /// Request in `<module>/<relative file>` form.
    request: String,
    /// Candidate locations that were checked, in order.
    searched: Vec<PathBuf>,
  },
  /// The resolved file exists but could not be read.
  #[error("failed to read {}: {source}", path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// The module's `package.json` is not a valid JSON object.
  #[error("failed to parse {}: {source}", path.display())]
  InvalidPackage {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
  /// The package metadata has no `version` field, or it is `null`.
  #[error("package metadata for '{module_name}' has no version")]
  MissingVersion {
    /// Module whose metadata is incomplete.
    module_name: String,
  },
}

impl ResolveError {
  /// Returns `true` when the error means the module is not installed.
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::ModuleNotFound { .. })
  }
}
