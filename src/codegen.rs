//! Rust-side rendering of the define map for crates consumed through a build script.

use std::sync::OnceLock;

use anyhow::{Result, anyhow};
use regex::Regex;

use crate::models::DefineMap;
use crate::registrar::RegistrationPlan;

fn identifier_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("invalid identifier regex"))
}

/// Render every define as a `pub const NAME: &str = "...";` item.
pub fn render_define_constants(defines: &DefineMap) -> Result<String> {
  let mut items = vec!["// Generated at build time by module-static-copy".to_string()];

  for (name, public_path) in defines {
    if !identifier_pattern().is_match(name) || name == "_" {
      return Err(anyhow!("define '{name}' is not a valid Rust identifier"));
    }
    let literal = serde_json::to_string(public_path)?;
    items.push(format!("pub const {name}: &str = {literal};"));
  }

  let mut code = items.join("\n");
  code.push('\n');
  Ok(code)
}

/// Build script directives for a registration plan.
///
/// Each resolved marker triggers a rebuild when it changes, and each define is exported
/// as a `rustc-env` variable so it can be read with `env!`. Cargo reads one directive per
/// line, so values containing control characters are rejected.
pub fn cargo_directives(plan: &RegistrationPlan) -> Result<Vec<String>> {
  let mut directives = Vec::with_capacity(plan.marker_paths.len() + plan.defines.len());

  for path in &plan.marker_paths {
    let path = path.display().to_string();
    ensure_single_line("marker path", &path)?;
    directives.push(format!("cargo:rerun-if-changed={path}"));
  }

  for (name, public_path) in &plan.defines {
    ensure_single_line("define name", name)?;
    if name.is_empty() || name.contains('=') {
      return Err(anyhow!("define '{name}' cannot be exported as an environment variable"));
    }
    ensure_single_line("public path", public_path)?;
    directives.push(format!("cargo:rustc-env={name}={public_path}"));
  }

  Ok(directives)
}

fn ensure_single_line(what: &str, value: &str) -> Result<()> {
  if value.chars().any(char::is_control) {
    return Err(anyhow!("{what} {value:?} contains control characters"));
  }
  Ok(())
}
