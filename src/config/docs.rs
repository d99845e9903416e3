use serde::Serialize;

/// Documentation for one published element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocEntry {
	pub name: String,

	/// The default as written by the declaring module.
	pub default: String,

	/// Whether `default` is a TOML value that can be pasted into an override file.
	pub literal: bool,

	pub doc: String,

	/// Whether override files may replace the value.
	pub overridable: bool,
}

/// Documentation for one `load_elements` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocSection {
	pub elements: Vec<DocEntry>,

	/// Description of the group as a whole.
	pub doc: String,
}

/// Render the documentation registry as plain text.
pub fn render_text(sections: &[DocSection]) -> String {
	let mut out = String::new();
	for section in sections {
		if !section.doc.is_empty() {
			out.push_str(&format!("# {}\n", section.doc));
		}
		for entry in &section.elements {
			let kind = if entry.overridable { "option" } else { "constant" };
			out.push_str(&format!("{} ({})\n", entry.name, kind));
			if !entry.default.is_empty() {
				out.push_str(&format!("    default: {}\n", entry.default));
			}
			if !entry.doc.is_empty() {
				out.push_str(&format!("    {}\n", entry.doc));
			}
		}
		out.push('\n');
	}
	out
}

/// Render the documentation registry as pretty JSON.
pub fn render_json(sections: &[DocSection]) -> serde_json::Result<String> {
	serde_json::to_string_pretty(sections)
}

/// Build a commented override file listing every option.
///
/// Constants are skipped since override files cannot change them. Only
/// literal defaults become commented assignments; a computed default is
/// described instead, so uncommenting any `NAME = value` line leaves a
/// valid file.
pub fn render_override_template(sections: &[DocSection]) -> String {
	let mut out = String::from("# Instance configuration overrides.\n# Uncomment an assignment to override the default.\n");
	for section in sections {
		let options: Vec<_> = section.elements.iter().filter(|e| e.overridable).collect();
		if options.is_empty() {
			continue;
		}
		out.push('\n');
		if !section.doc.is_empty() {
			out.push_str(&format!("## {}\n", section.doc));
		}
		for entry in options {
			if !entry.doc.is_empty() {
				out.push_str(&format!("# {}\n", entry.doc));
			}
			let line = if entry.literal {
				format!("# {} = {}\n", entry.name, entry.default)
			} else if entry.default.is_empty() {
				format!("# {} (required)\n", entry.name)
			} else {
				format!("# {} (default: {})\n", entry.name, entry.default)
			};
			out.push_str(&line);
		}
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sections() -> Vec<DocSection> {
		vec![
			DocSection {
				elements: vec![DocEntry {
					name: "INSTANCE_ROOT".to_string(),
					default: "\"/srv/strata\"".to_string(),
					literal: true,
					doc: "Root of the instance".to_string(),
					overridable: false,
				}],
				doc: "Core".to_string(),
			},
			DocSection {
				elements: vec![
					DocEntry {
						name: "LOG_LEVEL".to_string(),
						default: "\"info\"".to_string(),
						literal: true,
						doc: "Log verbosity".to_string(),
						overridable: true,
					},
					DocEntry {
						name: "CACHE_DIR".to_string(),
						default: "INSTANCE_ROOT/cache".to_string(),
						literal: false,
						doc: "Cache directory".to_string(),
						overridable: true,
					},
					DocEntry {
						name: "API_TOKEN".to_string(),
						default: String::new(),
						literal: false,
						doc: String::new(),
						overridable: true,
					},
				],
				doc: String::new(),
			},
		]
	}

	#[test]
	fn test_render_text() {
		let text = render_text(&sections());

		assert!(text.contains("# Core"));
		assert!(text.contains("INSTANCE_ROOT (constant)"));
		assert!(text.contains("LOG_LEVEL (option)"));
		assert!(text.contains("default: \"info\""));
	}

	#[test]
	fn test_render_json_keeps_grouping() {
		let json = render_json(&sections()).unwrap();
		let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

		assert_eq!(parsed.as_array().unwrap().len(), 2);
		assert_eq!(parsed[0]["elements"][0]["name"], "INSTANCE_ROOT");
		assert_eq!(parsed[1]["elements"][0]["overridable"], true);
	}

	#[test]
	fn test_override_template_skips_constants() {
		let template = render_override_template(&sections());

		assert!(template.contains("# LOG_LEVEL = \"info\""));
		assert!(!template.contains("INSTANCE_ROOT ="));
		assert!(!template.contains("# INSTANCE_ROOT"));
	}

	#[test]
	fn test_override_template_describes_computed_defaults() {
		let template = render_override_template(&sections());

		assert!(template.contains("# CACHE_DIR (default: INSTANCE_ROOT/cache)\n"));
		assert!(template.contains("# API_TOKEN (required)\n"));
		assert!(!template.contains("CACHE_DIR ="));
		assert!(!template.contains("API_TOKEN ="));
	}

	#[test]
	fn test_override_template_uncommented_is_valid_toml() {
		let template = render_override_template(&sections());
		let uncommented: String = template
			.lines()
			.map(|line| match line.strip_prefix("# ") {
				Some(rest) if rest.contains(" = ") => rest,
				_ => line,
			})
			.map(|line| format!("{}\n", line))
			.collect();

		let table: toml::Table = toml::from_str(&uncommented).unwrap();
		assert_eq!(table.len(), 1);
		assert_eq!(table["LOG_LEVEL"].as_str(), Some("info"));
	}
}
