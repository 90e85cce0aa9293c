use std::path::Path;
use std::path::PathBuf;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const STATS_SOURCE: &str = "// lua api: table
// name: Stats
// Player statistics.
// lua api: field
// table: Stats
// field: health: number
// Current health points.
";

pub fn luadoc_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("luadoc"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

/// Source and output roots of a fixture project.
pub struct Fixture {
	pub primary: PathBuf,
	pub secondary: PathBuf,
	pub output: PathBuf,
}

impl Fixture {
	/// Create `src/` (holding `files`), an empty `lib/`, and point the
	/// output at `out/`.
	pub fn new(root: &Path, files: &[(&str, &str)]) -> std::io::Result<Self> {
		let fixture = Self {
			primary: root.join("src"),
			secondary: root.join("lib"),
			output: root.join("out"),
		};
		std::fs::create_dir_all(&fixture.primary)?;
		std::fs::create_dir_all(&fixture.secondary)?;
		for (name, content) in files {
			let path = fixture.primary.join(name);
			if let Some(parent) = path.parent() {
				std::fs::create_dir_all(parent)?;
			}
			std::fs::write(path, content)?;
		}
		Ok(fixture)
	}

	/// A `luadoc` command with the three roots already passed.
	pub fn cmd(&self) -> Command {
		let mut cmd = luadoc_cmd();
		cmd.arg(&self.primary)
			.arg(&self.secondary)
			.arg(&self.output);
		cmd
	}
}
