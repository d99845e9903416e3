//! Identifier rules shared by config elements and modules.

use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

static MODULE_NAME: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
		.expect("valid module name regex")
});

/// Check that `name` can be published as a configuration value.
pub fn is_identifier(name: &str) -> bool {
	IDENTIFIER.is_match(name)
}

/// Check that `name` is a dotted module path such as `app.config.core`.
pub fn is_module_name(name: &str) -> bool {
	MODULE_NAME.is_match(name)
}

/// Return true if `name` is a direct child of the dotted `prefix`.
///
/// An empty prefix selects top-level names.
pub fn is_direct_child(name: &str, prefix: &str) -> bool {
	if prefix.is_empty() {
		return !name.is_empty() && !name.contains('.');
	}
	match name.strip_prefix(prefix).and_then(|rest| rest.strip_prefix('.')) {
		Some(child) => !child.is_empty() && !child.contains('.'),
		None => false,
	}
}
