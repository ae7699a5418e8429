//! Build tool plugin shape, the copy plugin seam and `config` hook wrapping.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::models::{ConfigCommand, ConfigEnv, DefineMap, StaticCopyOptions, UserConfig};

/// Configuration lifecycle hook.
///
/// The hook may mutate `config` in place. `Ok(None)` means the mutated object is the
/// result; `Ok(Some(..))` returns a configuration the host merges on top.
pub type ConfigHook =
  Box<dyn Fn(&mut UserConfig, &ConfigEnv) -> anyhow::Result<Option<UserConfig>> + Send + Sync>;

/// A build tool plugin object.
pub struct Plugin {
  /// Plugin name reported to the host.
  pub name: String,
  /// Restrict the plugin to one command.
  pub apply: Option<ConfigCommand>,
  /// Optional configuration hook.
  pub config: Option<ConfigHook>,
}

impl Plugin {
  /// Plugin without hooks.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      apply: None,
      config: None,
    }
  }

  /// Attach a configuration hook.
  pub fn with_config<F>(mut self, hook: F) -> Self
  where
    F: Fn(&mut UserConfig, &ConfigEnv) -> anyhow::Result<Option<UserConfig>>
      + Send
      + Sync
      + 'static,
  {
    self.config = Some(Box::new(hook));
    self
  }

  /// Restrict the plugin to one command.
  pub fn with_apply(mut self, command: ConfigCommand) -> Self {
    self.apply = Some(command);
    self
  }

  /// Run the configuration hook the way the host would.
  pub fn run_config(
    &self,
    config: &mut UserConfig,
    env: &ConfigEnv,
  ) -> anyhow::Result<Option<UserConfig>> {
    match &self.config {
      Some(hook) => hook(config, env),
      None => Ok(None),
    }
  }
}

impl fmt::Debug for Plugin {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Plugin")
      .field("name", &self.name)
      .field("apply", &self.apply)
      .field("config", &self.config.is_some())
      .finish()
  }
}

/// Creates the plugins that perform the actual copying at build time.
pub trait CopyPluginFactory {
  /// Build plugins for the gathered copy rules.
  fn create(&self, options: StaticCopyOptions) -> anyhow::Result<Vec<Plugin>>;
}

impl<F> CopyPluginFactory for F
where
  F: Fn(StaticCopyOptions) -> anyhow::Result<Vec<Plugin>>,
{
  fn create(&self, options: StaticCopyOptions) -> anyhow::Result<Vec<Plugin>> {
    self(options)
  }
}

/// Layer define injection over a plugin's `config` hook.
///
/// Every define is written into `config.define` as a JSON string literal before the
/// original hook runs on the same config. The original return value is passed through.
pub fn inject_defines(mut plugin: Plugin, defines: Arc<DefineMap>) -> Plugin {
  let original = plugin.config.take();
  plugin.config = Some(Box::new(move |config: &mut UserConfig, env: &ConfigEnv| {
    apply_defines(config, &defines)?;
    match &original {
      Some(hook) => hook(config, env),
      None => Ok(None),
    }
  }));
  plugin
}

fn apply_defines(config: &mut UserConfig, defines: &DefineMap) -> anyhow::Result<()> {
  let define = config.define.get_or_insert_with(Map::new);
  for (key, public_path) in defines {
    define.insert(key.clone(), Value::String(serde_json::to_string(public_path)?));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use std::sync::Mutex;

  fn defines() -> Arc<DefineMap> {
    Arc::new(DefineMap::from([
      ("DEMO_PATH".to_string(), "demo-1.0.0".to_string()),
      ("OTHER".to_string(), "scope-pkg-2.0.0".to_string()),
    ]))
  }

  #[test]
  fn creates_define_map_and_returns_in_place_result_without_original_hook() {
    let plugin = inject_defines(Plugin::new("copy"), defines());
    let mut config = UserConfig::default();

    let result = plugin.run_config(&mut config, &ConfigEnv::build()).unwrap();

    assert!(result.is_none());
    let define = config.define.unwrap();
    assert_eq!(define.get("DEMO_PATH"), Some(&json!("\"demo-1.0.0\"")));
    assert_eq!(define.get("OTHER"), Some(&json!("\"scope-pkg-2.0.0\"")));
  }

  #[test]
  fn keeps_existing_define_entries() {
    let plugin = inject_defines(Plugin::new("copy"), defines());
    let mut config = UserConfig {
      define: Some(Map::from_iter([
        ("DEBUG".to_string(), json!("false")),
        ("DEMO_PATH".to_string(), json!("stale")),
      ])),
      ..UserConfig::default()
    };

    plugin.run_config(&mut config, &ConfigEnv::serve()).unwrap();

    let define = config.define.unwrap();
    assert_eq!(define.get("DEBUG"), Some(&json!("false")));
    assert_eq!(define.get("DEMO_PATH"), Some(&json!("\"demo-1.0.0\"")));
  }

  #[test]
  fn original_hook_sees_injected_defines_and_its_result_is_returned() {
    let seen = Arc::new(Mutex::new(None));
    let seen_by_hook = Arc::clone(&seen);
    let plugin = Plugin::new("copy").with_config(move |config, env| {
      *seen_by_hook.lock().unwrap() = config.define.clone();
      let mut partial = UserConfig::default();
      partial
        .rest
        .insert("mode".into(), Value::String(env.mode.clone()));
      Ok(Some(partial))
    });

    let wrapped = inject_defines(plugin, defines());
    let mut config = UserConfig::default();
    let result = wrapped
      .run_config(&mut config, &ConfigEnv::build())
      .unwrap()
      .unwrap();

    assert_eq!(result.rest.get("mode"), Some(&json!("production")));
    assert!(result.define.is_none());
    let seen = seen.lock().unwrap().clone().unwrap();
    assert_eq!(seen.get("DEMO_PATH"), Some(&json!("\"demo-1.0.0\"")));
  }

  #[test]
  fn original_hook_errors_pass_through() {
    let plugin = Plugin::new("copy").with_config(|_, _| Err(anyhow::anyhow!("hook failed")));
    let wrapped = inject_defines(plugin, defines());

    let err = wrapped
      .run_config(&mut UserConfig::default(), &ConfigEnv::build())
      .unwrap_err();
    assert_eq!(err.to_string(), "hook failed");
  }

  #[test]
  fn wrapper_is_reapplied_on_every_pass() {
    let wrapped = inject_defines(Plugin::new("copy"), defines());
    let mut first = UserConfig::default();
    let mut second = UserConfig::default();

    wrapped.run_config(&mut first, &ConfigEnv::build()).unwrap();
    wrapped.run_config(&mut second, &ConfigEnv::serve()).unwrap();

    assert_eq!(first.define, second.define);
  }

  #[test]
  fn wrapping_preserves_plugin_identity() {
    let plugin = Plugin::new("copy:build").with_apply(ConfigCommand::Build);
    let wrapped = inject_defines(plugin, Arc::new(DefineMap::new()));

    assert_eq!(wrapped.name, "copy:build");
    assert_eq!(wrapped.apply, Some(ConfigCommand::Build));

    let mut config = UserConfig::default();
    wrapped.run_config(&mut config, &ConfigEnv::build()).unwrap();
    assert_eq!(config.define, Some(Map::new()));
  }

  #[test]
  fn closures_act_as_factories() {
    let factory = |options: StaticCopyOptions| -> anyhow::Result<Vec<Plugin>> {
      Ok(vec![Plugin::new(format!("copy:{}", options.targets.len()))])
    };
    let plugins = factory.create(StaticCopyOptions::default()).unwrap();
    assert_eq!(plugins[0].name, "copy:0");
  }
}
