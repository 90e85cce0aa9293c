use std::path::Path;
use std::path::PathBuf;

use crate::LuadocResult;
use crate::config::DocConfig;
use crate::model::ApiRegistry;
use crate::scanner::ScanSummary;
use crate::scanner::scan_sources;
use crate::writer::GeneratedFile;
use crate::writer::generate;

/// The source roots and config of one documentation run.
#[derive(Debug, Clone)]
pub struct DocProject {
	/// Root of the main sources. Fragment directories are looked up
	/// relative to it.
	pub primary_root: PathBuf,
	/// Root of additional sources, scanned after the primary root.
	pub secondary_root: PathBuf,
	pub config: DocConfig,
	/// Where the config was loaded from, if a file was used.
	pub config_path: Option<PathBuf>,
}

impl DocProject {
	/// Build a project with the config found next to the primary root (in
	/// its parent directory), or with `config_path` when given.
	pub fn load(
		primary_root: &Path,
		secondary_root: &Path,
		config_path: Option<&Path>,
	) -> LuadocResult<Self> {
		let (config, config_path) = match config_path {
			Some(path) => (DocConfig::load_file(path)?, Some(path.to_path_buf())),
			None => {
				let project_root = primary_root.parent().unwrap_or(primary_root);
				match DocConfig::discover(project_root) {
					Some(path) => (DocConfig::load_file(&path)?, Some(path)),
					None => (DocConfig::default(), None),
				}
			}
		};

		Ok(Self {
			primary_root: primary_root.to_path_buf(),
			secondary_root: secondary_root.to_path_buf(),
			config,
			config_path,
		})
	}

	pub fn roots(&self) -> Vec<PathBuf> {
		vec![self.primary_root.clone(), self.secondary_root.clone()]
	}

	/// Scan both roots into a fresh registry.
	pub fn scan(&self) -> LuadocResult<(ApiRegistry, ScanSummary)> {
		scan_sources(&self.roots(), &self.config)
	}

	/// Scan, apply an optional namespace override, and render everything.
	pub fn build(&self, namespace_override: Option<&str>) -> LuadocResult<BuildOutput> {
		let (mut registry, summary) = self.scan()?;
		if let Some(namespace) = namespace_override {
			registry.set_namespace(namespace);
		}
		let files = generate(&registry, &self.config)?;
		Ok(BuildOutput {
			registry,
			summary,
			files,
		})
	}
}

/// Everything produced by [`DocProject::build`].
#[derive(Debug)]
pub struct BuildOutput {
	pub registry: ApiRegistry,
	pub summary: ScanSummary,
	pub files: Vec<GeneratedFile>,
}
