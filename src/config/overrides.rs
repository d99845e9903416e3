use crate::config::parser::load_namespace_file;
use crate::error::Result;
use crate::value::{Namespace, Value};
use std::path::Path;

/// The instance and local override namespaces.
///
/// Lookups check the local namespace first, then the instance namespace.
#[derive(Debug, Clone, Default)]
pub struct OverrideStore {
	instance: Namespace,
	local: Namespace,
}

impl OverrideStore {
	pub fn new(instance: Namespace, local: Namespace) -> Self {
		Self { instance, local }
	}

	/// Load both namespaces from disk. Missing files load as empty.
	pub fn load(instance_file: &Path, local_file: &Path) -> Result<Self> {
		let instance = load_namespace_file(instance_file)?;
		if !instance.is_empty() {
			tracing::debug!("Loaded instance config from {}", instance_file.display());
		}
		let local = load_namespace_file(local_file)?;
		if !local.is_empty() {
			tracing::debug!("Loaded local config from {}", local_file.display());
		}
		Ok(Self { instance, local })
	}

	/// Find the override for `name`, if any.
	pub fn lookup(&self, name: &str) -> Option<&Value> {
		self.local.get(name).or_else(|| self.instance.get(name))
	}

	pub fn instance(&self) -> &Namespace {
		&self.instance
	}

	pub fn local(&self) -> &Namespace {
		&self.local
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_local_wins_over_instance() {
		let instance: Namespace = [("PORT", 8000i64), ("HOST", 1i64)].into_iter().collect();
		let local: Namespace = [("PORT", 9090i64)].into_iter().collect();
		let store = OverrideStore::new(instance, local);

		assert_eq!(store.lookup("PORT"), Some(&Value::Integer(9090)));
		assert_eq!(store.lookup("HOST"), Some(&Value::Integer(1)));
		assert_eq!(store.lookup("MISSING"), None);
	}

	#[test]
	fn test_load_with_missing_files() {
		let temp_dir = tempfile::tempdir().unwrap();
		let store = OverrideStore::load(
			&temp_dir.path().join("instance_config.toml"),
			&temp_dir.path().join("local_config_overrides.toml"),
		)
		.unwrap();

		assert!(store.instance().is_empty());
		assert!(store.local().is_empty());
	}
}
