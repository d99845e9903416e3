//! Strata - dependency-ordered configuration aggregation.
//!
//! This library provides the core functionality for strata, including:
//! - Configuration modules discovered from a registry by namespace prefix
//! - Dependency-ordered loading with deadlock reporting
//! - Constants and overridable options with lazily evaluated defaults
//! - Instance and local override files layered over code defaults
//!
//! # Example
//!
//! ```no_run
//! use strata_config::config::{ConfigElement, ConfigManager, DefaultExpr};
//! use strata_config::module::{FnModule, ModuleRegistry};
//!
//! let mut registry = ModuleRegistry::new();
//! registry
//!     .register(FnModule::elements(
//!         "app.config.core",
//!         "Core settings",
//!         vec![ConfigElement::option("PORT", DefaultExpr::literal(8080i64), "Listen port")],
//!     ))
//!     .unwrap();
//!
//! let manager = ConfigManager::new("app.config", None, Vec::<String>::new(), &registry).unwrap();
//! let port: i64 = manager.get_as("PORT").unwrap();
//! println!("Listening on {}", port);
//! ```

pub mod builtin;
pub mod config;
pub mod error;
pub mod module;
pub mod names;
pub mod value;

pub use error::{Result, StrataError};
pub use value::{Namespace, Value};
