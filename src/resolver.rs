//! Module resolution seam used by the registrar.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ResolveError;
use crate::models::ModulePackage;

/// File name of a module's package descriptor.
pub const PACKAGE_MANIFEST: &str = "package.json";

/// Service that locates installed modules and reads their package metadata.
pub trait ModuleResolver {
  /// Resolve `<module>/<relative file>` to an absolute path.
  fn resolve(&self, request: &str) -> Result<PathBuf, ResolveError>;

  /// Load the parsed `<module>/package.json`.
  fn load_package(&self, module_name: &str) -> Result<ModulePackage, ResolveError>;
}

impl<R: ModuleResolver + ?Sized> ModuleResolver for &R {
  fn resolve(&self, request: &str) -> Result<PathBuf, ResolveError> {
    (**self).resolve(request)
  }

  fn load_package(&self, module_name: &str) -> Result<ModulePackage, ResolveError> {
    (**self).load_package(module_name)
  }
}

/// Looks modules up in `node_modules` directories from a base directory upwards.
///
/// Only plain file lookups are performed: no `exports` maps, extension probing or symlink
/// resolution. The first ancestor whose `node_modules/<request>` is an existing file wins.
#[derive(Debug, Clone)]
pub struct NodeModulesResolver {
  base_dir: PathBuf,
}

impl NodeModulesResolver {
  /// Create a resolver that starts searching at `base_dir`.
  pub fn new(base_dir: impl Into<PathBuf>) -> Self {
    Self {
      base_dir: base_dir.into(),
    }
  }

  /// Directory the upward search starts from.
  pub fn base_dir(&self) -> &Path {
    &self.base_dir
  }

  fn search_roots(&self) -> Result<Vec<PathBuf>, ResolveError> {
    let base = std::path::absolute(&self.base_dir).map_err(|source| ResolveError::Io {
      path: self.base_dir.clone(),
      source,
    })?;
    Ok(
      base
        .ancestors()
        .map(|ancestor| ancestor.join("node_modules"))
        .collect(),
    )
  }
}

impl ModuleResolver for NodeModulesResolver {
  fn resolve(&self, request: &str) -> Result<PathBuf, ResolveError> {
    let mut searched = Vec::new();
    for root in self.search_roots()? {
      let candidate = root.join(request);
      if candidate.is_file() {
        return Ok(candidate);
      }
      searched.push(candidate);
    }

    Err(ResolveError::ModuleNotFound {
      request: request.to_string(),
      searched,
    })
  }

  fn load_package(&self, module_name: &str) -> Result<ModulePackage, ResolveError> {
    let path = self.resolve(&format!("{module_name}/{PACKAGE_MANIFEST}"))?;
    let content = fs::read_to_string(&path).map_err(|source| ResolveError::Io {
      path: path.clone(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| ResolveError::InvalidPackage { path, source })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  fn install(root: &Path, module: &str, files: &[(&str, &str)]) {
    let module_dir = root.join("node_modules").join(module);
    for (relative, content) in files {
      let path = module_dir.join(relative);
      fs::create_dir_all(path.parent().unwrap()).unwrap();
      fs::write(path, content).unwrap();
    }
  }

  #[test]
  fn resolves_from_ancestor_node_modules() {
    let temp = tempdir().unwrap();
    let project = temp.path().join("project");
    let nested = project.join("packages/app");
    fs::create_dir_all(&nested).unwrap();
    install(&project, "@scope/pkg", &[("dist/pkg.wasm", "wasm")]);

    let resolver = NodeModulesResolver::new(&nested);
    let resolved = resolver.resolve("@scope/pkg/dist/pkg.wasm").unwrap();

    assert!(resolved.is_absolute());
    assert!(resolved.ends_with("node_modules/@scope/pkg/dist/pkg.wasm"));
  }

  #[test]
  fn search_starts_at_the_configured_base_dir() {
    let temp = tempdir().unwrap();
    let resolver = NodeModulesResolver::new(temp.path().join("app"));
    assert_eq!(resolver.base_dir(), temp.path().join("app"));

    let err = resolver.resolve("demo/package.json").unwrap_err();
    match err {
      ResolveError::ModuleNotFound { searched, .. } => {
        assert_eq!(searched[0], temp.path().join("app/node_modules/demo/package.json"));
        assert_eq!(searched[1], temp.path().join("node_modules/demo/package.json"));
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn nearest_node_modules_takes_precedence() {
    let temp = tempdir().unwrap();
    let outer = temp.path();
    let inner = outer.join("inner");
    install(outer, "demo", &[("package.json", r#"{"version":"1.0.0"}"#)]);
    install(&inner, "demo", &[("package.json", r#"{"version":"2.0.0"}"#)]);

    let package = NodeModulesResolver::new(&inner).load_package("demo").unwrap();
    assert_eq!(package.version().as_deref(), Some("2.0.0"));
  }

  #[test]
  fn missing_module_reports_searched_locations() {
    let temp = tempdir().unwrap();
    let resolver = NodeModulesResolver::new(temp.path());

    let err = resolver.resolve("missing/package.json").unwrap_err();
    assert!(err.is_not_found());
    match err {
      ResolveError::ModuleNotFound { request, searched } => {
        assert_eq!(request, "missing/package.json");
        assert_eq!(
          searched[0],
          temp.path().join("node_modules").join("missing/package.json")
        );
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn directories_do_not_satisfy_a_request() {
    let temp = tempdir().unwrap();
    fs::create_dir_all(temp.path().join("node_modules/demo/package.json")).unwrap();

    let err = NodeModulesResolver::new(temp.path())
      .resolve("demo/package.json")
      .unwrap_err();
    assert!(err.is_not_found());
  }

  #[test]
  fn invalid_package_json_is_reported() {
    let temp = tempdir().unwrap();
    install(temp.path(), "broken", &[("package.json", "[1, 2]")]);

    let err = NodeModulesResolver::new(temp.path())
      .load_package("broken")
      .unwrap_err();
    assert!(matches!(err, ResolveError::InvalidPackage { .. }));
  }
}
