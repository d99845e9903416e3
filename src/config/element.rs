use crate::config::context::Context;
use crate::config::docs::DocEntry;
use crate::config::overrides::OverrideStore;
use crate::error::{Result, StrataError};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Computes a default from the names published so far.
pub type Evaluator = Arc<dyn Fn(&Context<'_>) -> Result<Value> + Send + Sync>;

/// A lazily evaluated default.
///
/// Pairs the text shown in documentation with the function that produces the
/// value. Nothing runs until the owning element is resolved.
#[derive(Clone)]
pub struct DefaultExpr {
	source: String,
	literal: bool,
	eval: Option<Evaluator>,
}

impl DefaultExpr {
	/// A default computed by `eval`, documented as `source`.
	pub fn expr<F>(source: impl Into<String>, eval: F) -> Self
	where
		F: Fn(&Context<'_>) -> Result<Value> + Send + Sync + 'static,
	{
		Self {
			source: source.into(),
			literal: false,
			eval: Some(Arc::new(eval)),
		}
	}

	/// A fixed value, documented in its TOML form.
	pub fn literal(value: impl Into<Value>) -> Self {
		let value = value.into();
		let source = value.to_toml().to_string();
		Self {
			literal: true,
			..Self::expr(source, move |_| Ok(value.clone()))
		}
	}

	/// The value already published as `name`.
	pub fn reference(name: impl Into<String>) -> Self {
		let name = name.into();
		let target = name.clone();
		Self::expr(name, move |ctx| ctx.get(&target).cloned())
	}

	/// No default: the value must come from an override file.
	pub fn required() -> Self {
		Self {
			source: String::new(),
			literal: false,
			eval: None,
		}
	}

	pub fn source(&self) -> &str {
		&self.source
	}

	/// True when `source` is a TOML value that an override file can carry.
	pub fn is_literal(&self) -> bool {
		self.literal
	}

	pub fn is_required(&self) -> bool {
		self.eval.is_none()
	}

	/// Run the default against `ctx`. Returns `None` for a required default.
	pub fn evaluate(&self, ctx: &Context<'_>) -> Option<Result<Value>> {
		self.eval.as_ref().map(|eval| eval(ctx))
	}
}

impl fmt::Debug for DefaultExpr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DefaultExpr")
			.field("source", &self.source)
			.field("literal", &self.literal)
			.field("required", &self.is_required())
			.finish()
	}
}

/// Whether an element can be overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
	/// Fixed by code. Always evaluates its default.
	Constant,

	/// Read from the local overrides, then the instance overrides, then the
	/// default.
	Option,
}

/// A named, documented configuration value declaration.
#[derive(Debug, Clone)]
pub struct ConfigElement {
	kind: ElementKind,
	name: String,
	default: DefaultExpr,
	doc: String,
}

impl ConfigElement {
	pub fn constant(name: impl Into<String>, default: DefaultExpr, doc: impl Into<String>) -> Self {
		Self {
			kind: ElementKind::Constant,
			name: name.into(),
			default,
			doc: doc.into(),
		}
	}

	pub fn option(name: impl Into<String>, default: DefaultExpr, doc: impl Into<String>) -> Self {
		Self {
			kind: ElementKind::Option,
			name: name.into(),
			default,
			doc: doc.into(),
		}
	}

	pub fn kind(&self) -> ElementKind {
		self.kind
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn default(&self) -> &DefaultExpr {
		&self.default
	}

	pub fn doc(&self) -> &str {
		&self.doc
	}

	/// Resolve the element's value.
	///
	/// `ctx` must already hold every name the default reads; a missing name
	/// surfaces as [`StrataError::UnresolvedName`].
	pub fn value(&self, ctx: &Context<'_>, overrides: &OverrideStore) -> Result<Value> {
		match self.kind {
			ElementKind::Constant => match self.default.evaluate(ctx) {
				Some(result) => result,
				None => Err(StrataError::MissingDefault {
					name: self.name.clone(),
				}),
			},
			ElementKind::Option => {
				if let Some(value) = overrides.lookup(&self.name) {
					return Ok(value.clone());
				}
				match self.default.evaluate(ctx) {
					Some(result) => result,
					None => {
						tracing::error!(
							"Required config option not set in instance config: {}",
							self.name
						);
						Err(StrataError::RequiredOptionMissing {
							name: self.name.clone(),
						})
					}
				}
			}
		}
	}

	pub fn doc_render(&self) -> DocEntry {
		DocEntry {
			name: self.name.clone(),
			default: self.default.source().to_string(),
			literal: self.default.is_literal(),
			doc: self.doc.clone(),
			overridable: self.kind == ElementKind::Option,
		}
	}
}
