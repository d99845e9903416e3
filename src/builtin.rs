//! Modules shipped with the `strata` binary.

use crate::config::{
	ConfigElement, ConfigManager, DefaultExpr, INSTANCE_CONFIG_FILE, INSTANCE_ROOT,
	LOCAL_CONFIG_FILE,
};
use crate::error::Result;
use crate::module::{ConfigModule, ModuleRegistry};
use crate::value::Value;
use std::path::{Path, PathBuf};

/// Namespace holding the built-in modules.
pub const PREFIX: &str = "strata.config";

pub const CORE_MODULE: &str = "strata.config.core";
pub const PATHS_MODULE: &str = "strata.config.paths";

/// File names of the override files inside the instance root.
pub const INSTANCE_CONFIG_NAME: &str = "instance_config.toml";
pub const LOCAL_CONFIG_NAME: &str = "local_config_overrides.toml";

/// Default instance root, `~/.strata`.
pub fn default_instance_root() -> Option<PathBuf> {
	dirs::home_dir().map(|home| home.join(".strata"))
}

/// Publishes the instance layout and loads the override files.
#[derive(Debug, Clone)]
pub struct CoreModule {
	instance_root: PathBuf,
	load_overrides: bool,
}

impl CoreModule {
	pub fn new(instance_root: impl Into<PathBuf>) -> Self {
		Self {
			instance_root: instance_root.into(),
			load_overrides: true,
		}
	}

	/// Leave both override namespaces empty, so every option takes its
	/// default and a broken override file cannot stop the load.
	pub fn without_overrides(mut self) -> Self {
		self.load_overrides = false;
		self
	}

	fn layout(&self) -> Vec<ConfigElement> {
		vec![
			ConfigElement::constant(
				INSTANCE_ROOT,
				DefaultExpr::literal(self.instance_root.clone()),
				"Directory holding this instance's configuration and data",
			),
			ConfigElement::constant(
				INSTANCE_CONFIG_FILE,
				DefaultExpr::expr(format!("INSTANCE_ROOT/{}", INSTANCE_CONFIG_NAME), |ctx| {
					ctx.join(INSTANCE_ROOT, INSTANCE_CONFIG_NAME)
				}),
				"Instance-wide override file",
			),
			ConfigElement::constant(
				LOCAL_CONFIG_FILE,
				DefaultExpr::expr(format!("INSTANCE_ROOT/{}", LOCAL_CONFIG_NAME), |ctx| {
					ctx.join(INSTANCE_ROOT, LOCAL_CONFIG_NAME)
				}),
				"Machine-local override file, checked before the instance file",
			),
		]
	}

	fn options(&self) -> Vec<ConfigElement> {
		vec![
			ConfigElement::option(
				"INSTANCE_NAME",
				DefaultExpr::expr("basename(INSTANCE_ROOT)", |ctx| {
					let root = ctx.get_path(INSTANCE_ROOT)?;
					let name = root
						.file_name()
						.map(|name| name.to_string_lossy().trim_start_matches('.').to_string())
						.filter(|name| !name.is_empty())
						.unwrap_or_else(|| "strata".to_string());
					Ok(Value::String(name))
				}),
				"Human-readable name of this instance",
			),
			ConfigElement::option(
				"LOG_LEVEL",
				DefaultExpr::literal("info"),
				"Log verbosity for applications embedding this instance",
			),
		]
	}
}

impl ConfigModule for CoreModule {
	fn name(&self) -> &str {
		CORE_MODULE
	}

	fn load(&self, manager: &mut ConfigManager) -> Result<()> {
		manager.load_elements(&self.layout(), "Instance layout")?;
		if self.load_overrides {
			manager.load_config_files()?;
		}
		manager.load_elements(&self.options(), "Instance identity")
	}
}

/// Working directories derived from the instance root.
#[derive(Debug, Clone, Default)]
pub struct PathsModule;

fn under_root(name: &'static str, relative: &'static str, doc: &str) -> ConfigElement {
	ConfigElement::option(
		name,
		DefaultExpr::expr(format!("INSTANCE_ROOT/{}", relative), move |ctx| {
			ctx.join(INSTANCE_ROOT, relative)
		}),
		doc,
	)
}

impl ConfigModule for PathsModule {
	fn name(&self) -> &str {
		PATHS_MODULE
	}

	fn depends(&self) -> Vec<String> {
		vec![CORE_MODULE.to_string()]
	}

	fn load(&self, manager: &mut ConfigManager) -> Result<()> {
		let elements = vec![
			under_root("CACHE_DIR", "cache", "Cache directory"),
			under_root("LOG_DIR", "logs", "Log directory"),
			ConfigElement::option(
				"TEMP_DIR",
				DefaultExpr::expr("$TMPDIR or system temp", |ctx| {
					Ok(Value::Path(
						ctx.env("TMPDIR")
							.map(PathBuf::from)
							.unwrap_or_else(|| ctx.temp_dir()),
					))
				}),
				"Scratch directory",
			),
		];
		manager.load_elements(&elements, "Working directories")
	}
}

/// Registry with the built-in modules for `instance_root`.
///
/// The paths module is registered ahead of the core module it depends on;
/// the loader sorts that out. With `load_overrides` off, the override files
/// are never read.
pub fn builtin_registry(instance_root: &Path, load_overrides: bool) -> Result<ModuleRegistry> {
	let mut core = CoreModule::new(instance_root);
	if !load_overrides {
		core = core.without_overrides();
	}

	let mut registry = ModuleRegistry::new();
	registry.register(PathsModule)?;
	registry.register(core)?;
	Ok(registry)
}
