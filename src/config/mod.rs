//! Configuration elements and the manager that resolves them.
//!
//! This module handles:
//! - Constant and option declarations with lazily evaluated defaults
//! - Instance and local override files
//! - Publishing resolved values and their documentation

pub mod context;
pub mod docs;
pub mod element;
pub mod manager;
pub mod overrides;
pub mod parser;

pub use context::Context;
pub use docs::{DocEntry, DocSection, render_json, render_override_template, render_text};
pub use element::{ConfigElement, DefaultExpr, ElementKind, Evaluator};
pub use manager::{ConfigManager, INSTANCE_CONFIG_FILE, INSTANCE_ROOT, LOCAL_CONFIG_FILE};
pub use overrides::OverrideStore;
pub use parser::{load_namespace_file, parse_namespace_file, parse_namespace_str};
