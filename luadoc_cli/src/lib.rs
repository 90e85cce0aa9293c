use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Generate Lua API reference pages and LuaLS definition stubs from annotated C/C++ \
	         comments.",
	long_about = "luadoc scans C/C++ sources for `// Lua API: <Kind>` comment blocks and writes \
	              one markdown reference page and one LuaLS `---@meta` stub per documented \
	              table and class.\n\nGenerated files land in `<OUTPUT_ROOT>/tables` and \
	              `<OUTPUT_ROOT>/classes`. Hand-written pages found in the fragments directory \
	              (`../docs/lua` next to the primary root by default) are copied over the \
	              generated ones.\n\nExamples:\n  luadoc src lib/src docs/generated\n  luadoc \
	              src lib/src docs/generated --check --diff"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct LuadocCli {
	/// Main source root. Hand-written fragments are looked up relative to
	/// it and the config file is discovered in its parent directory.
	pub primary_root: PathBuf,

	/// Additional source root, scanned after the primary root.
	pub secondary_root: PathBuf,

	/// Directory receiving the generated `tables/` and `classes/` trees.
	pub output_root: PathBuf,

	/// Path to a config file. Defaults to `luadoc.toml`, `.luadoc.toml` or
	/// `.config/luadoc.toml` in the parent of the primary root.
	#[arg(long)]
	pub config: Option<PathBuf>,

	/// Namespace prefixed to every table and class name. Takes precedence
	/// over `namespace` annotations and the config file.
	#[arg(long)]
	pub namespace: Option<String>,

	/// Verify that the output directory is up to date without writing.
	/// Exits with status 1 when any generated file is missing or stale.
	#[arg(long, default_value_t = false, conflicts_with = "dry_run")]
	pub check: bool,

	/// Show a unified diff for each stale file. Only used with `--check`.
	#[arg(long, default_value_t = false, requires = "check")]
	pub diff: bool,

	/// Print the files that would be written without touching the output
	/// directory.
	#[arg(long, default_value_t = false)]
	pub dry_run: bool,

	/// Enable verbose output.
	#[arg(long, short, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, default_value_t = false)]
	pub no_color: bool,
}
