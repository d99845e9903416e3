use std::path::PathBuf;

/// Library-level structured errors for strata.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum StrataError {
	#[error("Name is not defined in the configuration namespace: {name}")]
	UnresolvedName { name: String },

	#[error("Required config option not set in instance config: {name}")]
	RequiredOptionMissing { name: String },

	#[error("Config constant has no default: {name}")]
	MissingDefault { name: String },

	#[error("Config value {name} has the wrong type (expected {expected}, found {found})")]
	TypeMismatch {
		name: String,
		expected: &'static str,
		found: &'static str,
	},

	#[error("Invalid value for {name}: {reason}")]
	InvalidValue { name: String, reason: String },

	#[error("Invalid identifier: {name}")]
	InvalidName { name: String },

	#[error("Config module is already registered: {name}")]
	DuplicateModule { name: String },

	#[error("Config module not found: {name}")]
	ModuleNotFound { name: String },

	#[error("Legacy config module not found: {name}")]
	LegacyNotFound { name: String },

	#[error("Failed to read override file: {path}")]
	OverrideReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse override file: {path}")]
	OverrideParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Feature {feature} is unavailable; it might be provided by {provider}")]
	FeatureUnavailable { feature: String, provider: String },
}

impl StrataError {
	/// Signal that an optional capability is absent.
	///
	/// Consumers raise this; the loader itself never does.
	pub fn feature_unavailable(feature: impl Into<String>, provider: impl Into<String>) -> Self {
		StrataError::FeatureUnavailable {
			feature: feature.into(),
			provider: provider.into(),
		}
	}
}

/// Result type alias using StrataError.
pub type Result<T> = std::result::Result<T, StrataError>;
