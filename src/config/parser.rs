use crate::error::{Result, StrataError};
use crate::names::is_identifier;
use crate::value::Namespace;
use std::path::Path;

/// Load an override file as a flat namespace.
///
/// A missing file yields an empty namespace rather than an error.
pub fn load_namespace_file(path: &Path) -> Result<Namespace> {
	if !path.exists() {
		tracing::debug!("No override file at {}", path.display());
		return Ok(Namespace::new());
	}
	parse_namespace_file(path)
}

/// Parse an override file from the given path.
pub fn parse_namespace_file(path: &Path) -> Result<Namespace> {
	let content =
		std::fs::read_to_string(path).map_err(|source| StrataError::OverrideReadError {
			path: path.to_path_buf(),
			source,
		})?;

	parse_namespace_str(&content, path)
}

/// Parse an override namespace from a string (useful for testing).
pub fn parse_namespace_str(content: &str, path: &Path) -> Result<Namespace> {
	let table: toml::Table =
		toml::from_str(content).map_err(|source| StrataError::OverrideParseError {
			path: path.to_path_buf(),
			source,
		})?;

	for key in table.keys().filter(|key| !is_identifier(key)) {
		tracing::warn!(
			"Override {} in {} is not a valid config name and will never match",
			key,
			path.display()
		);
	}

	Ok(Namespace::from(table))
}
