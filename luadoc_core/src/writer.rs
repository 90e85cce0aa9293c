use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use crate::LuadocResult;
use crate::config::DocConfig;
use crate::model::ApiRegistry;
use crate::render::DocFormat;
use crate::render::RenderContext;
use crate::render::validate_registry;

/// Output subdirectory for table documents.
pub const TABLES_DIR: &str = "tables";
/// Output subdirectory for class documents.
pub const CLASSES_DIR: &str = "classes";

/// A rendered document and its path relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
	pub relative_path: PathBuf,
	pub format: DocFormat,
	pub content: String,
}

/// A generated file whose on-disk content differs from what would be
/// written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleFile {
	pub path: PathBuf,
	/// Current content, or `None` when the file does not exist.
	pub current: Option<String>,
	pub expected: String,
}

/// A hand-written fragment directory to overlay onto the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentCopy {
	pub source: PathBuf,
	pub destination: PathBuf,
}

/// Validate the registry and render every table and class in both formats.
///
/// Nothing is returned (and therefore nothing can be written) when
/// validation fails. Tables come first, then classes, each in first-seen
/// order.
pub fn generate(registry: &ApiRegistry, config: &DocConfig) -> LuadocResult<Vec<GeneratedFile>> {
	validate_registry(registry)?;
	let ctx = RenderContext::from_registry(registry, config);
	let mut files = Vec::new();

	for format in DocFormat::ALL {
		let renderer = format.renderer();
		for table in registry.tables() {
			files.push(GeneratedFile {
				relative_path: Path::new(TABLES_DIR).join(format!(
					"{}.{}",
					ctx.qualify_table(&table.name),
					format.extension()
				)),
				format,
				content: renderer.table(table, &ctx),
			});
		}
	}

	for format in DocFormat::ALL {
		let renderer = format.renderer();
		for class in registry.classes() {
			files.push(GeneratedFile {
				relative_path: Path::new(CLASSES_DIR).join(format!(
					"{}.{}",
					ctx.qualify(&class.name),
					format.extension()
				)),
				format,
				content: renderer.class(class, &ctx),
			});
		}
	}

	Ok(files)
}

/// Write generated files below `output_root`, replacing existing files.
pub fn write_generated(output_root: &Path, files: &[GeneratedFile]) -> LuadocResult<()> {
	std::fs::create_dir_all(output_root.join(TABLES_DIR))?;
	std::fs::create_dir_all(output_root.join(CLASSES_DIR))?;

	for file in files {
		let path = output_root.join(&file.relative_path);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		if path.exists() {
			std::fs::remove_file(&path)?;
		}
		std::fs::write(&path, &file.content)?;
		tracing::debug!(path = %path.display(), "wrote document");
	}

	Ok(())
}

/// Compare generated files with the output tree. Files at `shadowed`
/// relative paths are replaced by fragments and therefore skipped.
pub fn check_generated(
	output_root: &Path,
	files: &[GeneratedFile],
	shadowed: &HashSet<PathBuf>,
) -> LuadocResult<Vec<StaleFile>> {
	let mut stale = Vec::new();

	for file in files {
		if shadowed.contains(&file.relative_path) {
			continue;
		}

		let path = output_root.join(&file.relative_path);
		let current = if path.is_file() {
			Some(std::fs::read_to_string(&path)?)
		} else {
			None
		};

		if current.as_deref() != Some(file.content.as_str()) {
			stale.push(StaleFile {
				path,
				current,
				expected: file.content.clone(),
			});
		}
	}

	Ok(stale)
}

/// Find the fragment directories (`classes/` and `tables/` under the
/// configured fragments directory) that exist next to the primary root.
pub fn plan_fragments(
	primary_root: &Path,
	output_root: &Path,
	config: &DocConfig,
) -> Vec<FragmentCopy> {
	let fragments_root = primary_root.join(&config.fragments_dir);
	[CLASSES_DIR, TABLES_DIR]
		.into_iter()
		.map(|dir| FragmentCopy {
			source: fragments_root.join(dir),
			destination: output_root.join(dir),
		})
		.filter(|copy| copy.source.is_dir())
		.collect()
}

/// Relative output paths that a fragment overlay will replace.
pub fn fragment_paths(copies: &[FragmentCopy], output_root: &Path) -> LuadocResult<HashSet<PathBuf>> {
	let mut paths = HashSet::new();
	for copy in copies {
		let mut files = Vec::new();
		list_files(&copy.source, &mut files)?;
		for file in files {
			if let Ok(relative) = file.strip_prefix(&copy.source) {
				let destination = copy.destination.join(relative);
				if let Ok(relative) = destination.strip_prefix(output_root) {
					paths.insert(relative.to_path_buf());
				}
			}
		}
	}
	Ok(paths)
}

/// Copy each fragment directory into its destination, overwriting files of
/// the same name.
pub fn copy_fragments(copies: &[FragmentCopy]) -> LuadocResult<()> {
	for copy in copies {
		copy_dir_recursive(&copy.source, &copy.destination)?;
	}
	Ok(())
}

fn copy_dir_recursive(source: &Path, destination: &Path) -> LuadocResult<()> {
	std::fs::create_dir_all(destination)?;
	for entry in std::fs::read_dir(source)? {
		let entry = entry?;
		let source_path = entry.path();
		let destination_path = destination.join(entry.file_name());

		if source_path.is_dir() {
			copy_dir_recursive(&source_path, &destination_path)?;
		} else {
			std::fs::copy(&source_path, &destination_path)?;
			tracing::debug!(path = %destination_path.display(), "copied fragment");
		}
	}
	Ok(())
}

fn list_files(dir: &Path, files: &mut Vec<PathBuf>) -> LuadocResult<()> {
	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_dir() {
			list_files(&path, files)?;
		} else {
			files.push(path);
		}
	}
	Ok(())
}
