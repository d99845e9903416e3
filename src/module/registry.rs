use crate::error::{Result, StrataError};
use crate::module::{ConfigModule, ModuleProvider};
use crate::names::{is_direct_child, is_module_name};
use indexmap::IndexMap;
use std::sync::Arc;

/// Explicit table of every configuration module the application ships.
///
/// Registration order is the order modules are offered to the loader.
#[derive(Clone, Default)]
pub struct ModuleRegistry {
	modules: IndexMap<String, Arc<dyn ConfigModule>>,
}

impl ModuleRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a module under its declared name.
	pub fn register<M>(&mut self, module: M) -> Result<()>
	where
		M: ConfigModule + 'static,
	{
		self.register_arc(Arc::new(module))
	}

	pub fn register_arc(&mut self, module: Arc<dyn ConfigModule>) -> Result<()> {
		let name = module.name().to_string();
		if !is_module_name(&name) {
			return Err(StrataError::InvalidName { name });
		}
		if self.modules.contains_key(&name) {
			return Err(StrataError::DuplicateModule { name });
		}
		self.modules.insert(name, module);
		Ok(())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.modules.contains_key(name)
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.modules.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.modules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.modules.is_empty()
	}
}

impl ModuleProvider for ModuleRegistry {
	fn enumerate_namespace_modules(&self, prefix: &str) -> Vec<String> {
		self.modules
			.keys()
			.filter(|name| is_direct_child(name, prefix))
			.cloned()
			.collect()
	}

	fn import_module(&self, name: &str) -> Option<Arc<dyn ConfigModule>> {
		self.modules.get(name).cloned()
	}
}
