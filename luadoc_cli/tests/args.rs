use std::path::PathBuf;

use clap::Parser;
use luadoc_cli::LuadocCli;
use luadoc_core::AnyEmptyResult;

#[test]
fn parses_positional_roots() -> AnyEmptyResult {
	let args = LuadocCli::try_parse_from(["luadoc", "src", "lib/src", "docs/generated"])?;

	assert_eq!(args.primary_root, PathBuf::from("src"));
	assert_eq!(args.secondary_root, PathBuf::from("lib/src"));
	assert_eq!(args.output_root, PathBuf::from("docs/generated"));
	assert!(args.config.is_none());
	assert!(args.namespace.is_none());
	assert!(!args.check);
	assert!(!args.dry_run);

	Ok(())
}

#[test]
fn parses_options() -> AnyEmptyResult {
	let args = LuadocCli::try_parse_from([
		"luadoc",
		"src",
		"lib",
		"out",
		"--namespace",
		"rom",
		"--config",
		"custom.toml",
		"--check",
		"--diff",
		"-v",
		"--no-color",
	])?;

	assert_eq!(args.namespace.as_deref(), Some("rom"));
	assert_eq!(args.config, Some(PathBuf::from("custom.toml")));
	assert!(args.check);
	assert!(args.diff);
	assert!(args.verbose);
	assert!(args.no_color);

	Ok(())
}

#[test]
fn rejects_extra_positional_arguments() {
	assert!(LuadocCli::try_parse_from(["luadoc", "a", "b", "c", "d"]).is_err());
}

#[test]
fn check_conflicts_with_dry_run() {
	assert!(LuadocCli::try_parse_from(["luadoc", "a", "b", "c", "--check", "--dry-run"]).is_err());
}
