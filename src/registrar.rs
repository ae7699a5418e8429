//! Registers installed modules' static assets with a copy plugin and exposes their public
//! paths as compile-time defines.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::descriptor::ModuleDescriptor;
use crate::models::{DefineMap, StaticCopyOptions};
use crate::plugin::{CopyPluginFactory, Plugin, inject_defines};
use crate::public_path::default_public_path_resolver;
use crate::resolver::ModuleResolver;

/// Everything gathered from the module descriptors before any plugin is created.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPlan {
  /// Copy rules for the copy plugin factory.
  pub copy_options: StaticCopyOptions,
  /// Constant name to public path bindings.
  pub defines: DefineMap,
  /// Resolved module root markers, in registration order.
  pub marker_paths: Vec<PathBuf>,
}

/// Resolves module descriptors into copy plugins with define injection.
pub struct ModuleAssetRegistrar<R, F> {
  resolver: R,
  factory: F,
}

impl<R: ModuleResolver, F: CopyPluginFactory> ModuleAssetRegistrar<R, F> {
  /// Create a registrar over the given resolution service and copy plugin factory.
  pub fn new(resolver: R, factory: F) -> Self {
    Self { resolver, factory }
  }

  /// Run the accumulation pass without creating any plugin.
  pub fn plan(&self, modules: &[ModuleDescriptor]) -> anyhow::Result<RegistrationPlan> {
    plan_modules(&self.resolver, modules)
  }

  /// Build the copy plugins and wrap their `config` hooks with define injection.
  pub fn build(&self, modules: &[ModuleDescriptor]) -> anyhow::Result<Vec<Plugin>> {
    let RegistrationPlan {
      copy_options,
      defines,
      ..
    } = self.plan(modules)?;

    let defines = Arc::new(defines);
    let plugins = self.factory.create(copy_options)?;
    debug!(plugins = plugins.len(), defines = defines.len(), "wrapping copy plugins");

    Ok(
      plugins
        .into_iter()
        .map(|plugin| inject_defines(plugin, Arc::clone(&defines)))
        .collect(),
    )
  }
}

/// Resolve every descriptor in order and accumulate copy rules and defines.
///
/// The first failure aborts the whole pass.
pub fn plan_modules<R: ModuleResolver>(
  resolver: &R,
  modules: &[ModuleDescriptor],
) -> anyhow::Result<RegistrationPlan> {
  let mut plan = RegistrationPlan::default();

  for module in modules {
    let marker = resolver.resolve(&module.marker_request())?;
    let module_path = module_root(&marker, &module.find_module_path_by);
    let package = resolver.load_package(&module.module_name)?;

    let public_path = match &module.public_path_resolver {
      Some(resolve_public_path) => resolve_public_path(&module.module_name, &package)?,
      None => default_public_path_resolver(&module.module_name, &package)?,
    };
    debug!(
      module = %module.module_name,
      %module_path,
      %public_path,
      "registering module assets"
    );

    let targets = (module.targets)(&module_path, &public_path)?;
    plan.copy_options.targets.extend(targets);

    if let Some(define) = &module.define {
      plan.defines.insert(define.clone(), public_path);
    }
    plan.marker_paths.push(marker);
  }

  Ok(plan)
}

/// Shorthand for [`ModuleAssetRegistrar::build`].
pub fn static_copy_modules<R, F>(
  resolver: R,
  factory: F,
  modules: &[ModuleDescriptor],
) -> anyhow::Result<Vec<Plugin>>
where
  R: ModuleResolver,
  F: CopyPluginFactory,
{
  ModuleAssetRegistrar::new(resolver, factory).build(modules)
}

fn module_root(marker: &std::path::Path, find_module_path_by: &str) -> String {
  let marker = marker.to_string_lossy();
  if !marker.ends_with(find_module_path_by) {
    warn!(
      marker = %marker,
      find_module_path_by,
      "resolved marker does not end with the lookup file; trimming by length"
    );
  }
  strip_marker_suffix(&marker, find_module_path_by).to_string()
}

/// Drop `marker.len()` bytes from the end of `resolved`.
///
/// This trims by length only and assumes `resolved` ends with `marker` using the same
/// separators. The cut is moved back to the nearest char boundary.
fn strip_marker_suffix<'a>(resolved: &'a str, marker: &str) -> &'a str {
  let mut cut = resolved.len().saturating_sub(marker.len());
  while !resolved.is_char_boundary(cut) {
    cut -= 1;
  }
  &resolved[..cut]
}
