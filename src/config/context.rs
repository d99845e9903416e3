use crate::error::{Result, StrataError};
use crate::value::{Namespace, Value};
use std::path::{Path, PathBuf};

/// The names a default may read while it is being evaluated.
///
/// Wraps the manager's published namespace as it stands when the element is
/// resolved, so a default can only see values published before it. The
/// environment helpers cover what defaults typically need for building
/// paths.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
	namespace: &'a Namespace,
}

impl<'a> Context<'a> {
	pub fn new(namespace: &'a Namespace) -> Self {
		Self { namespace }
	}

	/// Look up a published value.
	pub fn get(&self, name: &str) -> Result<&'a Value> {
		self.namespace
			.get(name)
			.ok_or_else(|| StrataError::UnresolvedName {
				name: name.to_string(),
			})
	}

	/// Look up a published value and convert it.
	pub fn get_as<T>(&self, name: &str) -> Result<T>
	where
		T: for<'v> TryFrom<&'v Value, Error = StrataError>,
	{
		self.get(name)?.extract(name)
	}

	pub fn get_str(&self, name: &str) -> Result<&'a str> {
		let value = self.get(name)?;
		value.as_str().ok_or_else(|| StrataError::TypeMismatch {
			name: name.to_string(),
			expected: "string",
			found: value.type_name(),
		})
	}

	pub fn get_path(&self, name: &str) -> Result<PathBuf> {
		self.get_as(name)
	}

	/// Join `relative` onto the path published as `base`.
	pub fn join(&self, base: &str, relative: impl AsRef<Path>) -> Result<Value> {
		Ok(Value::Path(self.get_path(base)?.join(relative)))
	}

	pub fn env(&self, var: &str) -> Option<String> {
		std::env::var(var).ok().filter(|value| !value.is_empty())
	}

	pub fn home_dir(&self) -> Option<PathBuf> {
		dirs::home_dir()
	}

	pub fn temp_dir(&self) -> PathBuf {
		std::env::temp_dir()
	}
}
