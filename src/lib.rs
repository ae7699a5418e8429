#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod codegen;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod models;
pub mod plugin;
pub mod public_path;
pub mod registrar;
pub mod resolver;
mod template;

pub use descriptor::ModuleDescriptor;
pub use error::ResolveError;
pub use models::{ConfigEnv, CopyTarget, DefineMap, ModulePackage, StaticCopyOptions, UserConfig};
pub use plugin::{CopyPluginFactory, Plugin};
pub use public_path::default_public_path_resolver;
pub use registrar::{ModuleAssetRegistrar, RegistrationPlan, plan_modules, static_copy_modules};
pub use resolver::{ModuleResolver, NodeModulesResolver};
