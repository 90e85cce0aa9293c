use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use serde::Deserialize;

use crate::LuadocError;
use crate::LuadocResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["luadoc.toml", ".luadoc.toml", ".config/luadoc.toml"];

/// Marker that introduces a single-line comment in the scanned sources.
pub const COMMENT_MARKER: &str = "//";

/// Separator between a tag and its values, e.g. `// Param: name: type`.
pub const SEPARATOR: char = ':';

/// Configuration loaded from a `luadoc.toml` file.
///
/// Every key is optional:
///
/// ```toml
/// identifier = "lua api"
/// extension_prefixes = ["c", "h"]
/// global_table_marker = "Global Table"
/// namespace_placeholder = "{LUA_API_NAMESPACE}"
/// fragments_dir = "../docs/lua"
/// namespace = "rom"
///
/// [exclude]
/// patterns = ["third_party/"]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DocConfig {
	/// Text that marks a comment line as an annotation header. Matched
	/// case-insensitively.
	pub identifier: String,
	/// A file is scanned when its extension starts with one of these.
	pub extension_prefixes: Vec<String>,
	/// Tables whose name contains this text are never namespace-qualified.
	pub global_table_marker: String,
	/// Token in descriptions and types that is replaced with the namespace.
	pub namespace_placeholder: String,
	/// Directory holding hand-written `classes/` and `tables/` fragments,
	/// relative to the primary source root.
	pub fragments_dir: PathBuf,
	/// Namespace used when no `namespace` annotation sets one.
	pub namespace: Option<String>,
	pub exclude: ExcludeConfig,
}

impl Default for DocConfig {
	fn default() -> Self {
		Self {
			identifier: "lua api".to_string(),
			extension_prefixes: vec!["c".to_string(), "h".to_string()],
			global_table_marker: "Global Table".to_string(),
			namespace_placeholder: "{LUA_API_NAMESPACE}".to_string(),
			fragments_dir: PathBuf::from("../docs/lua"),
			namespace: None,
			exclude: ExcludeConfig::default(),
		}
	}
}

/// Files and directories to skip while scanning, in gitignore syntax.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ExcludeConfig {
	/// Patterns relative to each scanned source root, e.g. `"vendor/"` or
	/// `"*.generated.h"`.
	pub patterns: Vec<String>,
}

impl DocConfig {
	/// Parse a config from TOML text.
	pub fn from_toml(content: &str) -> LuadocResult<Self> {
		let config: Self =
			toml::from_str(content).map_err(|e| LuadocError::ConfigParse(e.to_string()))?;
		Ok(config)
	}

	/// Load the config file at `path`.
	pub fn load_file(path: &Path) -> LuadocResult<Self> {
		let content = std::fs::read_to_string(path)?;
		Self::from_toml(&content)
	}

	/// Find the first config file candidate inside `dir`.
	pub fn discover(dir: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| dir.join(candidate))
			.find(|path| path.is_file())
	}

	/// Whether a file extension (without the leading dot) selects the file
	/// for scanning.
	pub fn is_scannable_extension(&self, extension: &str) -> bool {
		self.extension_prefixes
			.iter()
			.any(|prefix| extension.starts_with(prefix.as_str()))
	}

	/// Build the exclude matcher for one scanned source root.
	pub fn exclude_matcher(&self, root: &Path) -> LuadocResult<Gitignore> {
		let mut builder = GitignoreBuilder::new(root);
		for pattern in &self.exclude.patterns {
			builder.add_line(None, pattern).map_err(|e| {
				LuadocError::InvalidExcludePattern {
					pattern: pattern.clone(),
					reason: e.to_string(),
				}
			})?;
		}
		builder
			.build()
			.map_err(|e| LuadocError::ConfigParse(format!("failed to build exclude rules: {e}")))
	}
}
