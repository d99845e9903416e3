use crate::config::ConfigManager;
use crate::error::{Result, StrataError};
use crate::module::ModuleProvider;

/// Outcome of loading a namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
	/// Modules loaded, in load order.
	pub loaded: Vec<String>,

	/// Modules whose dependencies were never satisfied.
	pub failed: Vec<String>,
}

impl LoadReport {
	pub fn is_complete(&self) -> bool {
		self.failed.is_empty()
	}
}

/// Load every module under the manager's prefix in dependency order.
///
/// Modules are offered in enumeration order, pass after pass. A module loads
/// as soon as everything in its `depends` has loaded, including modules
/// loaded earlier in the same pass. When a full pass loads nothing, one more
/// pass logs each stuck module and the loader gives up on them. Stuck modules
/// are reported, not raised, so the rest of the configuration stays usable.
///
/// Errors from a module's own `load` propagate immediately.
pub fn load_namespace(manager: &mut ConfigManager, provider: &dyn ModuleProvider) -> Result<LoadReport> {
	tracing::debug!("Loading configuration from {}", manager.prefix());

	let mut modules: Vec<String> = provider
		.enumerate_namespace_modules(manager.prefix())
		.into_iter()
		.filter(|name| !manager.excluded().contains(name))
		.collect();
	let mut report = LoadReport::default();
	let mut changed = true;
	let mut deadlocked = false;

	while !modules.is_empty() && !deadlocked {
		if !changed {
			deadlocked = true;
		}
		changed = false;
		let mut remaining = Vec::new();

		for name in modules {
			let module = provider
				.import_module(&name)
				.ok_or_else(|| StrataError::ModuleNotFound { name: name.clone() })?;

			if module.depends().iter().all(|dep| manager.is_loaded(dep)) {
				tracing::debug!("Loading {}", name);
				module.load(manager)?;
				manager.mark_loaded(&name);
				report.loaded.push(name);
				changed = true;
			} else {
				if deadlocked {
					tracing::error!("Failed loading {}. Missing dependency.", name);
					report.failed.push(name.clone());
				}
				remaining.push(name);
			}
		}

		modules = remaining;
	}

	Ok(report)
}
