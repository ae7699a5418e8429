//! Default public path derivation for module assets.

use crate::error::ResolveError;
use crate::models::ModulePackage;

/// Derive the public path for a module from its name and package version.
///
/// Every `@` is dropped and every `/` becomes `-`, then `-<version>` is appended, so
/// `@foo/bar` at `1.2.3` is served from `foo-bar-1.2.3`.
pub fn default_public_path_resolver(
    module_name: &str,
    package: &ModulePackage,
) -> anyhow::Result<String> {
    let version = package
        .version()
        .ok_or_else(|| ResolveError::MissingVersion {
            module_name: module_name.to_string(),
        })?;

    Ok(format!(
        "{}-{}",
        module_name.replace('@', "").replace('/', "-"),
        version
    ))
}
