use crate::error::StrataError;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A resolved configuration value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
	String(String),
	Integer(i64),
	Float(f64),
	Boolean(bool),
	Path(PathBuf),
	List(Vec<Value>),
	Table(Namespace),
}

impl Value {
	/// Short type name used in error messages.
	pub fn type_name(&self) -> &'static str {
		match self {
			Value::String(_) => "string",
			Value::Integer(_) => "integer",
			Value::Float(_) => "float",
			Value::Boolean(_) => "boolean",
			Value::Path(_) => "path",
			Value::List(_) => "list",
			Value::Table(_) => "table",
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_integer(&self) -> Option<i64> {
		match self {
			Value::Integer(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Boolean(b) => Some(*b),
			_ => None,
		}
	}

	/// Convert to `T`, naming `name` in a type mismatch error.
	pub fn extract<'a, T>(&'a self, name: &str) -> crate::Result<T>
	where
		T: TryFrom<&'a Value, Error = StrataError>,
	{
		T::try_from(self).map_err(|err| match err {
			StrataError::TypeMismatch {
				expected, found, ..
			} => StrataError::TypeMismatch {
				name: name.to_string(),
				expected,
				found,
			},
			other => other,
		})
	}

	/// The TOML form of this value, as it would appear in an override file.
	pub fn to_toml(&self) -> toml::Value {
		match self {
			Value::String(s) => toml::Value::String(s.clone()),
			Value::Integer(i) => toml::Value::Integer(*i),
			Value::Float(x) => toml::Value::Float(*x),
			Value::Boolean(b) => toml::Value::Boolean(*b),
			Value::Path(p) => toml::Value::String(p.to_string_lossy().into_owned()),
			Value::List(items) => toml::Value::Array(items.iter().map(Value::to_toml).collect()),
			Value::Table(table) => toml::Value::Table(
				table
					.iter()
					.map(|(name, value)| (name.clone(), value.to_toml()))
					.collect(),
			),
		}
	}

	/// Paths and strings both read as paths; override files only carry strings.
	pub fn as_path(&self) -> Option<PathBuf> {
		match self {
			Value::Path(p) => Some(p.clone()),
			Value::String(s) => Some(PathBuf::from(s)),
			_ => None,
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::String(s) => write!(f, "{}", s),
			Value::Integer(i) => write!(f, "{}", i),
			Value::Float(x) => write!(f, "{}", x),
			Value::Boolean(b) => write!(f, "{}", b),
			Value::Path(p) => write!(f, "{}", p.display()),
			Value::List(items) => {
				write!(f, "[")?;
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{}", item)?;
				}
				write!(f, "]")
			}
			Value::Table(table) => {
				write!(f, "{{")?;
				for (i, (name, value)) in table.iter().enumerate() {
					if i > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{} = {}", name, value)?;
				}
				write!(f, "}}")
			}
		}
	}
}

impl From<toml::Value> for Value {
	fn from(value: toml::Value) -> Self {
		match value {
			toml::Value::String(s) => Value::String(s),
			toml::Value::Integer(i) => Value::Integer(i),
			toml::Value::Float(x) => Value::Float(x),
			toml::Value::Boolean(b) => Value::Boolean(b),
			toml::Value::Datetime(dt) => Value::String(dt.to_string()),
			toml::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
			toml::Value::Table(table) => Value::Table(Namespace::from(table)),
		}
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::String(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Integer(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Float(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Boolean(value)
	}
}

impl From<PathBuf> for Value {
	fn from(value: PathBuf) -> Self {
		Value::Path(value)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(value: Vec<T>) -> Self {
		Value::List(value.into_iter().map(Into::into).collect())
	}
}

// The name is filled in by `Value::extract`, which knows what was looked up.
fn mismatch(value: &Value, expected: &'static str) -> StrataError {
	StrataError::TypeMismatch {
		name: String::new(),
		expected,
		found: value.type_name(),
	}
}

impl TryFrom<&Value> for String {
	type Error = StrataError;

	fn try_from(value: &Value) -> Result<Self, Self::Error> {
		value
			.as_str()
			.map(str::to_string)
			.ok_or_else(|| mismatch(value, "string"))
	}
}

impl TryFrom<&Value> for i64 {
	type Error = StrataError;

	fn try_from(value: &Value) -> Result<Self, Self::Error> {
		value.as_integer().ok_or_else(|| mismatch(value, "integer"))
	}
}

impl TryFrom<&Value> for f64 {
	type Error = StrataError;

	fn try_from(value: &Value) -> Result<Self, Self::Error> {
		match value {
			Value::Float(x) => Ok(*x),
			Value::Integer(i) => Ok(*i as f64),
			_ => Err(mismatch(value, "float")),
		}
	}
}

impl TryFrom<&Value> for bool {
	type Error = StrataError;

	fn try_from(value: &Value) -> Result<Self, Self::Error> {
		value.as_bool().ok_or_else(|| mismatch(value, "boolean"))
	}
}

impl TryFrom<&Value> for PathBuf {
	type Error = StrataError;

	fn try_from(value: &Value) -> Result<Self, Self::Error> {
		value.as_path().ok_or_else(|| mismatch(value, "path"))
	}
}

/// An insertion-ordered mapping from configuration name to value.
///
/// Used both for the override namespaces read from files and for the
/// values a [`ConfigManager`](crate::config::ConfigManager) publishes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Namespace {
	entries: IndexMap<String, Value>,
}

impl Namespace {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.entries.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Bind `name` to `value`, replacing an earlier binding in place.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.entries.insert(name.into(), value.into())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
		self.entries.iter()
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl From<toml::Table> for Namespace {
	fn from(table: toml::Table) -> Self {
		Namespace {
			entries: table.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
		}
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Namespace {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Namespace {
			entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_toml_keeps_types() {
		let table: toml::Table = toml::from_str(
			r#"
port = 9090
name = "bench"
ratio = 0.5
debug = true
hosts = ["a", "b"]
"#,
		)
		.unwrap();
		let ns = Namespace::from(table);

		assert_eq!(ns.get("port"), Some(&Value::Integer(9090)));
		assert_eq!(ns.get("name"), Some(&Value::from("bench")));
		assert_eq!(ns.get("ratio"), Some(&Value::Float(0.5)));
		assert_eq!(ns.get("debug"), Some(&Value::Boolean(true)));
		assert_eq!(ns.get("hosts"), Some(&Value::from(vec!["a", "b"])));
	}

	#[test]
	fn test_insert_replaces_in_place() {
		let mut ns: Namespace = [("A", 1i64), ("B", 2i64)].into_iter().collect();
		ns.insert("A", 10i64);

		let names: Vec<_> = ns.names().collect();
		assert_eq!(names, vec!["A", "B"]);
		assert_eq!(ns.get("A"), Some(&Value::Integer(10)));
	}

	#[test]
	fn test_try_from_mismatch() {
		let value = Value::from("not a number");
		match value.extract::<i64>("PORT") {
			Err(StrataError::TypeMismatch {
				name,
				expected,
				found,
			}) => {
				assert_eq!(name, "PORT");
				assert_eq!(expected, "integer");
				assert_eq!(found, "string");
			}
			other => panic!("Expected TypeMismatch, got {:?}", other),
		}
	}

	#[test]
	fn test_string_reads_as_path() {
		let value = Value::from("/srv/strata");
		assert_eq!(PathBuf::try_from(&value).unwrap(), PathBuf::from("/srv/strata"));
	}

	#[test]
	fn test_to_toml_parses_back() {
		let value = Value::List(vec![Value::from("a \"quoted\" path"), Value::Path(PathBuf::from("/srv"))]);
		let line = format!("X = {}", value.to_toml());
		let table: toml::Table = toml::from_str(&line).unwrap();

		assert_eq!(
			Value::from(table["X"].clone()),
			Value::from(vec!["a \"quoted\" path", "/srv"])
		);
	}

	#[test]
	fn test_display_list_and_table() {
		let mut table = Namespace::new();
		table.insert("x", 1i64);
		let value = Value::List(vec![Value::from("a"), Value::Table(table)]);
		assert_eq!(value.to_string(), "[a, {x = 1}]");
	}
}
