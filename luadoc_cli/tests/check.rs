mod common;

use common::Fixture;
use common::STATS_SOURCE;
use luadoc_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn check_passes_when_up_to_date() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let fixture = Fixture::new(tmp.path(), &[("stats.cpp", STATS_SOURCE)])?;
	fixture.cmd().assert().success();

	let _ = fixture
		.cmd()
		.arg("--check")
		.assert()
		.success()
		.stdout(predicates::str::contains("up to date"));

	Ok(())
}

#[test]
fn check_fails_when_output_is_missing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let fixture = Fixture::new(tmp.path(), &[("stats.cpp", STATS_SOURCE)])?;

	let _ = fixture
		.cmd()
		.arg("--check")
		.assert()
		.code(1)
		.stderr(predicates::str::contains("tables/Stats.md (missing)"))
		.stderr(predicates::str::contains("tables/Stats.lua (missing)"))
		.stderr(predicates::str::contains("2 generated file(s) are out of date"));

	assert!(!fixture.output.exists());

	Ok(())
}

#[test]
fn check_fails_when_sources_change() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let fixture = Fixture::new(tmp.path(), &[("stats.cpp", STATS_SOURCE)])?;
	fixture.cmd().assert().success();

	std::fs::write(
		fixture.primary.join("more.cpp"),
		"// Lua API: Field\n// Table: Stats\n// Field: mana: number\n",
	)?;

	let _ = fixture
		.cmd()
		.arg("--check")
		.assert()
		.code(1)
		.stderr(predicates::str::contains("tables/Stats.md (out of date)"))
		.stderr(predicates::str::contains("(missing)").not());

	Ok(())
}

#[test]
fn check_diff_shows_changes() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let fixture = Fixture::new(tmp.path(), &[("stats.cpp", STATS_SOURCE)])?;
	fixture.cmd().assert().success();
	std::fs::write(fixture.output.join("tables/Stats.md"), "edited\n")?;

	let _ = fixture
		.cmd()
		.arg("--check")
		.arg("--diff")
		.assert()
		.code(1)
		.stderr(predicates::str::contains("-edited"))
		.stderr(predicates::str::contains("+# Table: Stats"));

	Ok(())
}

#[test]
fn check_skips_files_replaced_by_fragments() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let fixture = Fixture::new(tmp.path(), &[("stats.cpp", STATS_SOURCE)])?;
	let fragments = tmp.path().join("docs/lua/tables");
	std::fs::create_dir_all(&fragments)?;
	std::fs::write(fragments.join("Stats.md"), "# Stats\n")?;
	fixture.cmd().assert().success();

	let _ = fixture
		.cmd()
		.arg("--check")
		.assert()
		.success()
		.stdout(predicates::str::contains("up to date"));

	Ok(())
}

#[test]
fn diff_requires_check() {
	let _ = common::luadoc_cmd()
		.args(["src", "lib", "out", "--diff"])
		.assert()
		.code(2);
}
