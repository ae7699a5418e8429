use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use module_static_copy::codegen::{cargo_directives, render_define_constants};
use module_static_copy::config::ModulesConfig;
use module_static_copy::{NodeModulesResolver, RegistrationPlan, plan_modules};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Configuration file; discovered in the current directory when omitted
  #[arg(short, long, global = true, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Directory module resolution starts from, overriding the configured root
  #[arg(long, global = true, value_name = "DIR")]
  root: Option<PathBuf>,

  /// Increase log verbosity (-v debug, -vv trace)
  #[arg(short, long, action = ArgAction::Count, global = true)]
  verbose: u8,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the resolved copy rules and defines as JSON
  Plan,
  /// Print Rust constants for every define
  Constants {
    /// Write the generated source to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
  /// Print build script directives
  Cargo,
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let (config, config_dir) = load_config(cli.config.as_deref())?;
  let root = cli
    .root
    .clone()
    .unwrap_or_else(|| config.root_dir(&config_dir));
  let resolver = NodeModulesResolver::new(root);
  info!(
    root = %resolver.base_dir().display(),
    modules = config.modules.len(),
    "resolving modules"
  );
  let plan = plan_modules(&resolver, &config.into_descriptors())?;

  match cli.command {
    Commands::Plan => print_plan(&plan)?,
    Commands::Constants { output } => {
      let code = render_define_constants(&plan.defines)?;
      match output {
        Some(path) => fs::write(&path, code)
          .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{code}"),
      }
    }
    Commands::Cargo => {
      for directive in cargo_directives(&plan)? {
        println!("{directive}");
      }
    }
  }

  Ok(())
}

fn init_logging(verbose: u8) {
  let default_level = match verbose {
    0 => "warn",
    1 => "debug",
    _ => "trace",
  };
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

fn load_config(path: Option<&Path>) -> Result<(ModulesConfig, PathBuf)> {
  if let Some(path) = path {
    let config = ModulesConfig::from_path(path)?;
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    return Ok((config, dir));
  }

  let cwd = std::env::current_dir().context("failed to read the current directory")?;
  let (config, found) = ModulesConfig::discover(&cwd)?;
  if found.is_none() {
    warn!(dir = %cwd.display(), "no module configuration found; nothing to register");
  }
  Ok((config, cwd))
}

fn print_plan(plan: &RegistrationPlan) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(plan)?);
  Ok(())
}
