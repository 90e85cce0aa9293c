use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;

use crate::LuadocError;
use crate::LuadocResult;
use crate::builder::DocKind;
use crate::builder::ModelBuilder;
use crate::config::COMMENT_MARKER;
use crate::config::DocConfig;
use crate::config::SEPARATOR;
use crate::model::ApiRegistry;

/// Counts reported after scanning a set of source roots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
	/// Number of files that were read.
	pub files: usize,
	/// Number of annotation blocks opened across all files.
	pub blocks: usize,
}

/// Scan every matching file under `roots` (in the given order) and build the
/// documentation model.
///
/// The config's default namespace is applied first so that `namespace`
/// annotations in the sources can override it.
pub fn scan_sources(roots: &[PathBuf], config: &DocConfig) -> LuadocResult<(ApiRegistry, ScanSummary)> {
	let mut registry = ApiRegistry::new();
	if let Some(namespace) = &config.namespace {
		registry.set_namespace(namespace);
	}

	let mut summary = ScanSummary::default();
	for file in collect_source_files(roots, config)? {
		let bytes = std::fs::read(&file)?;
		let content = normalize_line_endings(&String::from_utf8_lossy(&bytes));
		summary.blocks += scan_source(&content, &file, config, &mut registry)?;
		summary.files += 1;
	}

	tracing::info!(
		files = summary.files,
		blocks = summary.blocks,
		tables = registry.tables().len(),
		classes = registry.classes().len(),
		"scanned sources"
	);

	Ok((registry, summary))
}

/// Scan the content of a single file into `registry`. Returns the number of
/// annotation blocks found.
pub fn scan_source(
	content: &str,
	file: &Path,
	config: &DocConfig,
	registry: &mut ApiRegistry,
) -> LuadocResult<usize> {
	let mut builder = ModelBuilder::new(registry, file);
	let mut blocks = 0;

	for (index, raw_line) in content.lines().enumerate() {
		let line_number = index + 1;
		let line = raw_line.trim();
		let lower = line.to_lowercase();

		if is_annotation_header(&lower, config) {
			let value = line.split_once(SEPARATOR).map_or("", |(_, value)| value);
			let kind = DocKind::parse(value).ok_or_else(|| LuadocError::InvalidDocKind {
				kind: value.trim().to_string(),
				file: file.display().to_string(),
				line: line_number,
			})?;
			builder.begin(kind);
			blocks += 1;
			continue;
		}

		if builder.active_kind().is_some() && line.contains(COMMENT_MARKER) {
			builder.handle_line(line, line_number)?;
		} else {
			builder.end();
		}
	}

	if blocks > 0 {
		tracing::debug!(file = %file.display(), blocks, "scanned annotations");
	}

	Ok(blocks)
}

/// Whether a lowercased, trimmed line opens an annotation block.
pub fn is_annotation_header(lower: &str, config: &DocConfig) -> bool {
	lower.contains(config.identifier.to_lowercase().as_str())
		&& lower.contains(SEPARATOR)
		&& lower.contains(COMMENT_MARKER)
}

/// Collect the files to scan under each root, in root order. Files within a
/// root are sorted for deterministic output.
pub fn collect_source_files(roots: &[PathBuf], config: &DocConfig) -> LuadocResult<Vec<PathBuf>> {
	let mut all_files = Vec::new();

	for root in roots {
		if !root.is_dir() {
			tracing::warn!(root = %root.display(), "source root is not a directory, skipping");
			continue;
		}

		let exclude = config.exclude_matcher(root)?;
		let mut files = Vec::new();
		walk_dir(root, &mut files, &exclude, config)?;
		files.sort();
		all_files.extend(files);
	}

	Ok(all_files)
}

fn walk_dir(
	dir: &Path,
	files: &mut Vec<PathBuf>,
	exclude: &Gitignore,
	config: &DocConfig,
) -> LuadocResult<()> {
	for entry in std::fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();
		// Symlinked directories are not followed.
		let is_dir = entry.file_type()?.is_dir();

		if exclude.matched(&path, is_dir).is_ignore() {
			continue;
		}

		if is_dir {
			walk_dir(&path, files, exclude, config)?;
		} else if is_scannable_file(&path, config) {
			files.push(path);
		}
	}

	Ok(())
}

fn is_scannable_file(path: &Path, config: &DocConfig) -> bool {
	path.extension()
		.and_then(|ext| ext.to_str())
		.is_some_and(|ext| config.is_scannable_extension(ext))
}

/// Normalize CRLF line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		content.to_string()
	}
}
