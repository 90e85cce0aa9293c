use miette::Diagnostic;
use thiserror::Error;

use crate::model::Field;

/// A field whose name collides with an earlier field on the same owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateField {
	/// Display name of the owning table or class, e.g. `table Stats`.
	pub owner: String,
	/// The offending (second or later) field.
	pub field: Field,
}

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum LuadocError {
	#[error(transparent)]
	#[diagnostic(code(luadoc::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(luadoc::config_parse),
		help("check that luadoc.toml is valid TOML; every key is optional")
	)]
	ConfigParse(String),

	#[error("invalid exclude pattern `{pattern}`: {reason}")]
	#[diagnostic(code(luadoc::invalid_exclude_pattern))]
	InvalidExcludePattern { pattern: String, reason: String },

	#[error("invalid annotation kind `{kind}` at {file}:{line}")]
	#[diagnostic(
		code(luadoc::invalid_doc_kind),
		help("valid kinds: table, class, field, constructor, function, namespace")
	)]
	InvalidDocKind {
		kind: String,
		file: String,
		line: usize,
	},

	#[error("`{kind}` block at {file}:{line} uses a line before its owner is declared")]
	#[diagnostic(
		code(luadoc::missing_owner),
		help("declare the owner first with {expected}")
	)]
	MissingOwner {
		kind: String,
		expected: String,
		file: String,
		line: usize,
	},

	#[error(
		"duplicate field names: {}",
		.0.iter().map(|dup| format!("`{}` in {}", dup.field.name, dup.owner)).collect::<Vec<_>>().join(", ")
	)]
	#[diagnostic(
		code(luadoc::duplicate_fields),
		help("each field name must be unique within its table or class")
	)]
	DuplicateFields(Vec<DuplicateField>),
}

pub type LuadocResult<T> = Result<T, LuadocError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
