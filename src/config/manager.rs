use crate::config::context::Context;
use crate::config::docs::DocSection;
use crate::config::element::ConfigElement;
use crate::config::overrides::OverrideStore;
use crate::error::{Result, StrataError};
use crate::module::{ConfigModule, LoadReport, ModuleProvider, load_namespace};
use crate::names::is_identifier;
use crate::value::{Namespace, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Published name of the instance root directory.
pub const INSTANCE_ROOT: &str = "INSTANCE_ROOT";

/// Published name of the instance override file path.
pub const INSTANCE_CONFIG_FILE: &str = "INSTANCE_CONFIG_FILE";

/// Published name of the local override file path.
pub const LOCAL_CONFIG_FILE: &str = "LOCAL_CONFIG_FILE";

/// The aggregated configuration of an application.
///
/// Construction loads every module under `prefix` in dependency order. Each
/// module publishes its elements through [`ConfigManager::load_elements`];
/// the rest of the application reads them back with [`ConfigManager::get`].
pub struct ConfigManager {
	prefix: String,
	excluded: BTreeSet<String>,
	overrides: OverrideStore,
	namespace: Namespace,
	modules_loaded: Vec<String>,
	failed: Vec<String>,
	legacy: Option<Arc<dyn ConfigModule>>,
	docs: Vec<DocSection>,
}

impl ConfigManager {
	/// Build a manager and load every module under `prefix`.
	///
	/// A `legacy` module is loaded first, outside of dependency resolution,
	/// and stays reachable through [`ConfigManager::legacy`].
	pub fn new<I, S>(
		prefix: impl Into<String>,
		legacy: Option<&str>,
		excluded: I,
		provider: &dyn ModuleProvider,
	) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut manager = Self {
			prefix: prefix.into(),
			excluded: excluded.into_iter().map(Into::into).collect(),
			overrides: OverrideStore::default(),
			namespace: Namespace::new(),
			modules_loaded: Vec::new(),
			failed: Vec::new(),
			legacy: None,
			docs: Vec::new(),
		};
		if let Some(name) = legacy {
			manager.load_legacy(name, provider)?;
		}
		let report = load_namespace(&mut manager, provider)?;
		manager.failed = report.failed;
		Ok(manager)
	}

	fn load_legacy(&mut self, name: &str, provider: &dyn ModuleProvider) -> Result<()> {
		tracing::debug!("Loading legacy configuration from {}", name);
		let module = provider
			.import_module(name)
			.ok_or_else(|| StrataError::LegacyNotFound {
				name: name.to_string(),
			})?;
		module.load(self)?;
		self.legacy = Some(module);
		Ok(())
	}

	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	pub fn excluded(&self) -> &BTreeSet<String> {
		&self.excluded
	}

	pub fn legacy(&self) -> Option<&Arc<dyn ConfigModule>> {
		self.legacy.as_ref()
	}

	/// Modules loaded so far, in load order.
	pub fn modules_loaded(&self) -> &[String] {
		&self.modules_loaded
	}

	/// Modules skipped because their dependencies never loaded.
	pub fn failed_modules(&self) -> &[String] {
		&self.failed
	}

	pub fn load_report(&self) -> LoadReport {
		LoadReport {
			loaded: self.modules_loaded.clone(),
			failed: self.failed.clone(),
		}
	}

	pub(crate) fn is_loaded(&self, name: &str) -> bool {
		self.modules_loaded.iter().any(|loaded| loaded == name)
	}

	pub(crate) fn mark_loaded(&mut self, name: &str) {
		self.modules_loaded.push(name.to_string());
	}

	/// (Re)load the instance and local override files.
	///
	/// Their paths are read from the published `INSTANCE_CONFIG_FILE` and
	/// `LOCAL_CONFIG_FILE`, so a module must publish both first. Missing files
	/// load as empty namespaces.
	pub fn load_config_files(&mut self) -> Result<()> {
		let ctx = Context::new(&self.namespace);
		let instance_file = ctx.get_path(INSTANCE_CONFIG_FILE)?;
		let local_file = ctx.get_path(LOCAL_CONFIG_FILE)?;
		self.overrides = OverrideStore::load(&instance_file, &local_file)?;
		Ok(())
	}

	pub fn instance_config(&self) -> &Namespace {
		self.overrides.instance()
	}

	pub fn local_config(&self) -> &Namespace {
		self.overrides.local()
	}

	/// Resolve and publish `elements`, in order.
	///
	/// Each element sees everything published before it, including earlier
	/// elements of the same call. The call's documentation is recorded once
	/// all of them have been published.
	pub fn load_elements(&mut self, elements: &[ConfigElement], doc: &str) -> Result<()> {
		let mut section = DocSection {
			elements: Vec::with_capacity(elements.len()),
			doc: doc.to_string(),
		};
		for element in elements {
			if !is_identifier(element.name()) {
				return Err(StrataError::InvalidName {
					name: element.name().to_string(),
				});
			}
			let value = element.value(&Context::new(&self.namespace), &self.overrides)?;
			if self.namespace.insert(element.name(), value).is_some() {
				tracing::debug!("Replaced published value {}", element.name());
			}
			section.elements.push(element.doc_render());
		}
		self.docs.push(section);
		Ok(())
	}

	/// Join `path` onto the published instance root.
	pub fn instance_path(&self, path: &str) -> Result<PathBuf> {
		Ok(self.get_as::<PathBuf>(INSTANCE_ROOT)?.join(path))
	}

	pub fn doc_render(&self) -> &[DocSection] {
		&self.docs
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.namespace.get(name)
	}

	/// Look up a published value and convert it.
	pub fn get_as<T>(&self, name: &str) -> Result<T>
	where
		T: for<'v> TryFrom<&'v Value, Error = StrataError>,
	{
		Context::new(&self.namespace).get_as(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.namespace.contains(name)
	}

	/// Every published value, in publication order.
	pub fn namespace(&self) -> &Namespace {
		&self.namespace
	}
}

impl fmt::Debug for ConfigManager {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConfigManager")
			.field("prefix", &self.prefix)
			.field("excluded", &self.excluded)
			.field("modules_loaded", &self.modules_loaded)
			.field("failed", &self.failed)
			.field("legacy", &self.legacy.as_ref().map(|m| m.name().to_string()))
			.field("namespace", &self.namespace)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::DefaultExpr;
	use crate::module::{FnModule, ModuleRegistry};

	fn empty_manager() -> ConfigManager {
		ConfigManager::new("app.config", None, Vec::<String>::new(), &ModuleRegistry::new()).unwrap()
	}

	fn root_elements(root: &std::path::Path) -> Vec<ConfigElement> {
		vec![
			ConfigElement::constant(INSTANCE_ROOT, DefaultExpr::literal(root.to_path_buf()), ""),
			ConfigElement::constant(
				INSTANCE_CONFIG_FILE,
				DefaultExpr::expr("INSTANCE_ROOT/instance_config.toml", |ctx| {
					ctx.join(INSTANCE_ROOT, "instance_config.toml")
				}),
				"",
			),
			ConfigElement::constant(
				LOCAL_CONFIG_FILE,
				DefaultExpr::expr("INSTANCE_ROOT/local_config_overrides.toml", |ctx| {
					ctx.join(INSTANCE_ROOT, "local_config_overrides.toml")
				}),
				"",
			),
		]
	}

	#[test]
	fn test_load_elements_sees_earlier_elements() {
		let mut manager = empty_manager();
		manager
			.load_elements(
				&[
					ConfigElement::constant("BASE", DefaultExpr::literal(10i64), ""),
					ConfigElement::option(
						"DOUBLED",
						DefaultExpr::expr("BASE * 2", |ctx| {
							Ok(Value::Integer(ctx.get_as::<i64>("BASE")? * 2))
						}),
						"",
					),
				],
				"numbers",
			)
			.unwrap();

		assert_eq!(manager.get_as::<i64>("DOUBLED").unwrap(), 20);
		assert_eq!(manager.doc_render().len(), 1);
		assert_eq!(manager.doc_render()[0].doc, "numbers");
		assert_eq!(manager.doc_render()[0].elements.len(), 2);
	}

	#[test]
	fn test_load_elements_out_of_order_fails() {
		let mut manager = empty_manager();
		let result = manager.load_elements(
			&[
				ConfigElement::constant("CACHE", DefaultExpr::reference("ROOT"), ""),
				ConfigElement::constant("ROOT", DefaultExpr::literal("/srv"), ""),
			],
			"",
		);

		assert!(matches!(result, Err(StrataError::UnresolvedName { .. })));
		assert!(manager.doc_render().is_empty());
	}

	#[test]
	fn test_load_elements_partial_publish_on_error() {
		let mut manager = empty_manager();
		let result = manager.load_elements(
			&[
				ConfigElement::constant("FIRST", DefaultExpr::literal(1i64), ""),
				ConfigElement::option("SECRET_KEY", DefaultExpr::required(), ""),
			],
			"",
		);

		assert!(matches!(
			result,
			Err(StrataError::RequiredOptionMissing { .. })
		));
		assert!(manager.contains("FIRST"));
		assert!(!manager.contains("SECRET_KEY"));
		assert!(manager.doc_render().is_empty());
	}

	#[test]
	fn test_load_elements_rejects_invalid_name() {
		let mut manager = empty_manager();
		let result = manager.load_elements(
			&[ConfigElement::constant("log-level", DefaultExpr::literal("info"), "")],
			"",
		);

		assert!(matches!(result, Err(StrataError::InvalidName { .. })));
	}

	#[test]
	fn test_republish_replaces_value() {
		let mut manager = empty_manager();
		manager
			.load_elements(&[ConfigElement::constant("A", DefaultExpr::literal(1i64), "")], "")
			.unwrap();
		manager
			.load_elements(&[ConfigElement::constant("A", DefaultExpr::literal(2i64), "")], "")
			.unwrap();

		assert_eq!(manager.get("A"), Some(&Value::Integer(2)));
		assert_eq!(manager.namespace().len(), 1);
		assert_eq!(manager.doc_render().len(), 2);
	}

	#[test]
	fn test_load_config_files_and_layering() {
		let temp_dir = tempfile::tempdir().unwrap();
		std::fs::write(
			temp_dir.path().join("instance_config.toml"),
			"port = 8000\nhost = \"example.org\"\n",
		)
		.unwrap();
		std::fs::write(temp_dir.path().join("local_config_overrides.toml"), "port = 9090\n").unwrap();

		let mut manager = empty_manager();
		manager.load_elements(&root_elements(temp_dir.path()), "").unwrap();
		manager.load_config_files().unwrap();
		manager
			.load_elements(
				&[
					ConfigElement::option("port", DefaultExpr::literal(8080i64), "doc"),
					ConfigElement::option("host", DefaultExpr::literal("localhost"), "doc"),
					ConfigElement::option("user", DefaultExpr::literal("strata"), "doc"),
				],
				"",
			)
			.unwrap();

		assert_eq!(manager.get("port"), Some(&Value::Integer(9090)));
		assert_eq!(manager.get("host"), Some(&Value::from("example.org")));
		assert_eq!(manager.get("user"), Some(&Value::from("strata")));
		assert_eq!(manager.instance_config().len(), 2);
		assert_eq!(manager.local_config().len(), 1);
	}

	#[test]
	fn test_load_config_files_missing_files() {
		let temp_dir = tempfile::tempdir().unwrap();
		let mut manager = empty_manager();
		manager.load_elements(&root_elements(temp_dir.path()), "").unwrap();
		manager.load_config_files().unwrap();

		assert!(manager.instance_config().is_empty());
		assert!(manager.local_config().is_empty());
	}

	#[test]
	fn test_load_config_files_requires_paths() {
		let mut manager = empty_manager();
		assert!(matches!(
			manager.load_config_files(),
			Err(StrataError::UnresolvedName { .. })
		));
	}

	#[test]
	fn test_load_config_files_is_reloadable() {
		let temp_dir = tempfile::tempdir().unwrap();
		let local = temp_dir.path().join("local_config_overrides.toml");
		let mut manager = empty_manager();
		manager.load_elements(&root_elements(temp_dir.path()), "").unwrap();

		std::fs::write(&local, "port = 1\n").unwrap();
		manager.load_config_files().unwrap();
		assert_eq!(manager.local_config().get("port"), Some(&Value::Integer(1)));

		std::fs::remove_file(&local).unwrap();
		manager.load_config_files().unwrap();
		assert!(manager.local_config().is_empty());
	}

	#[test]
	fn test_instance_path() {
		let mut manager = empty_manager();
		manager
			.load_elements(
				&[ConfigElement::constant(
					INSTANCE_ROOT,
					DefaultExpr::literal(PathBuf::from("/srv/strata")),
					"",
				)],
				"",
			)
			.unwrap();

		assert_eq!(
			manager.instance_path("cache").unwrap(),
			PathBuf::from("/srv/strata/cache")
		);
	}

	#[test]
	fn test_legacy_loaded_first() {
		let mut registry = ModuleRegistry::new();
		registry
			.register(FnModule::elements(
				"legacy_settings",
				"legacy",
				vec![ConfigElement::constant("LEGACY_ROOT", DefaultExpr::literal("/opt/old"), "")],
			))
			.unwrap();
		registry
			.register(FnModule::elements(
				"app.config.core",
				"core",
				vec![ConfigElement::option("ROOT", DefaultExpr::reference("LEGACY_ROOT"), "")],
			))
			.unwrap();

		let manager =
			ConfigManager::new("app.config", Some("legacy_settings"), Vec::<String>::new(), &registry).unwrap();

		assert_eq!(manager.legacy().unwrap().name(), "legacy_settings");
		assert_eq!(manager.get("ROOT"), Some(&Value::from("/opt/old")));
		assert_eq!(manager.modules_loaded(), ["app.config.core"]);
	}

	#[test]
	fn test_legacy_not_found() {
		let result = ConfigManager::new(
			"app.config",
			Some("missing_settings"),
			Vec::<String>::new(),
			&ModuleRegistry::new(),
		);

		assert!(matches!(result, Err(StrataError::LegacyNotFound { .. })));
	}
}
