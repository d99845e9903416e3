//! Configuration-contributing modules.
//!
//! This module handles:
//! - The `ConfigModule` trait implemented by each contributor
//! - Namespace enumeration and lookup through the `ModuleRegistry`
//! - Dependency-ordered loading with deadlock reporting

pub mod loader;
pub mod registry;

pub use loader::{LoadReport, load_namespace};
pub use registry::ModuleRegistry;

use crate::config::{ConfigElement, ConfigManager};
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

/// A unit of configuration contributed to a [`ConfigManager`].
pub trait ConfigModule: Send + Sync {
	/// Dotted module name, e.g. `app.config.core`.
	fn name(&self) -> &str;

	/// Modules that must be loaded before this one.
	fn depends(&self) -> Vec<String> {
		Vec::new()
	}

	/// Publish this module's configuration into `manager`.
	fn load(&self, manager: &mut ConfigManager) -> Result<()>;
}

/// Source of configuration modules.
pub trait ModuleProvider {
	/// Names of every module directly under `prefix`, in a stable order.
	fn enumerate_namespace_modules(&self, prefix: &str) -> Vec<String>;

	/// Resolve a module by its full name.
	fn import_module(&self, name: &str) -> Option<Arc<dyn ConfigModule>>;
}

type LoadFn = Box<dyn Fn(&mut ConfigManager) -> Result<()> + Send + Sync>;

/// A module defined by a closure.
pub struct FnModule {
	name: String,
	depends: Vec<String>,
	load: LoadFn,
}

impl FnModule {
	pub fn new<F>(name: impl Into<String>, load: F) -> Self
	where
		F: Fn(&mut ConfigManager) -> Result<()> + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			depends: Vec::new(),
			load: Box::new(load),
		}
	}

	/// A module whose only job is a single `load_elements` call.
	pub fn elements(name: impl Into<String>, doc: impl Into<String>, elements: Vec<ConfigElement>) -> Self {
		let doc = doc.into();
		Self::new(name, move |manager| manager.load_elements(&elements, &doc))
	}

	pub fn depends_on<I, S>(mut self, depends: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.depends = depends.into_iter().map(Into::into).collect();
		self
	}
}

impl ConfigModule for FnModule {
	fn name(&self) -> &str {
		&self.name
	}

	fn depends(&self) -> Vec<String> {
		self.depends.clone()
	}

	fn load(&self, manager: &mut ConfigManager) -> Result<()> {
		(self.load)(manager)
	}
}

impl fmt::Debug for FnModule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FnModule")
			.field("name", &self.name)
			.field("depends", &self.depends)
			.finish()
	}
}
