use std::path::Path;
use std::process;

use clap::Parser;
use luadoc_cli::LuadocCli;
use luadoc_core::CLASSES_DIR;
use luadoc_core::DocFormat;
use luadoc_core::DocProject;
use luadoc_core::FragmentCopy;
use luadoc_core::GeneratedFile;
use luadoc_core::LuadocError;
use luadoc_core::TABLES_DIR;
use luadoc_core::check_generated;
use luadoc_core::copy_fragments;
use luadoc_core::fragment_paths;
use luadoc_core::plan_fragments;
use luadoc_core::write_generated;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

/// Generated groups in write order, with the progress message printed once
/// each group is on disk.
const WRITE_GROUPS: [(&str, DocFormat, &str); 4] = [
	(TABLES_DIR, DocFormat::Narrative, "Wrote tables"),
	(TABLES_DIR, DocFormat::Stub, "Wrote table definitions"),
	(CLASSES_DIR, DocFormat::Narrative, "Wrote classes"),
	(CLASSES_DIR, DocFormat::Stub, "Wrote class definitions"),
];

fn main() {
	let args = LuadocCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	if let Err(e) = run(&args) {
		match e.downcast::<LuadocError>() {
			Ok(luadoc_err) => {
				if let LuadocError::DuplicateFields(duplicates) = luadoc_err.as_ref() {
					eprintln!(
						"{}",
						colored!("Error while building lua doc. Duplicate field names:", red)
					);
					for duplicate in duplicates {
						eprintln!("{}", duplicate.field);
					}
				}
				let report: miette::Report = (*luadoc_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `--verbose` forces debug output, otherwise `RUST_LOG` is
/// used with `warn` as the fallback.
fn init_tracing(verbose: bool, use_color: bool) {
	let env_filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};

	let fmt_layer = fmt::layer()
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time();

	tracing_subscriber::registry()
		.with(env_filter)
		.with(fmt_layer)
		.try_init()
		.ok();
}

fn run(args: &LuadocCli) -> Result<(), Box<dyn std::error::Error>> {
	let project = DocProject::load(
		&args.primary_root,
		&args.secondary_root,
		args.config.as_deref(),
	)?;
	if let Some(path) = &project.config_path {
		tracing::debug!(path = %path.display(), "using config file");
	}

	let output = project.build(args.namespace.as_deref())?;
	if output.registry.is_empty() {
		tracing::warn!(
			files = output.summary.files,
			"no `Lua API` annotations found in the source roots"
		);
	}

	let copies = plan_fragments(&project.primary_root, &args.output_root, &project.config);

	if args.check {
		return run_check(args, &output.files, &copies);
	}

	if args.dry_run {
		print_dry_run(args, &output.files, &copies);
		return Ok(());
	}

	for (dir, format, message) in WRITE_GROUPS {
		let group: Vec<GeneratedFile> = output
			.files
			.iter()
			.filter(|file| file.format == format && file.relative_path.starts_with(dir))
			.cloned()
			.collect();
		write_generated(&args.output_root, &group)?;
		println!("{message}");
	}

	for copy in &copies {
		println!(
			"Copying '{}' to '{}'",
			copy.source.display(),
			copy.destination.display()
		);
	}
	copy_fragments(&copies)?;

	if args.verbose {
		println!(
			"{} {} file(s) from {} source file(s).",
			colored!("Generated", green),
			output.files.len(),
			output.summary.files
		);
	}

	Ok(())
}

fn run_check(
	args: &LuadocCli,
	files: &[GeneratedFile],
	copies: &[FragmentCopy],
) -> Result<(), Box<dyn std::error::Error>> {
	let shadowed = fragment_paths(copies, &args.output_root)?;
	let stale = check_generated(&args.output_root, files, &shadowed)?;

	if stale.is_empty() {
		println!(
			"{}",
			colored!("All generated files are up to date.", green)
		);
		return Ok(());
	}

	eprintln!("Check failed.");
	eprintln!();
	eprintln!("Stale files:");
	for entry in &stale {
		let rel = make_relative(&entry.path, &args.output_root);
		match &entry.current {
			Some(current) => {
				eprintln!("  {rel} {}", colored!("(out of date)", yellow));
				if args.diff {
					print_diff(current, &entry.expected);
				}
			}
			None => eprintln!("  {rel} {}", colored!("(missing)", red)),
		}
	}

	eprintln!();
	eprintln!(
		"{} generated file(s) are out of date. Run `luadoc` without `--check` to regenerate.",
		stale.len()
	);
	process::exit(1);
}

fn print_dry_run(args: &LuadocCli, files: &[GeneratedFile], copies: &[FragmentCopy]) {
	println!("Dry run: would write {} file(s):", files.len());
	for file in files {
		println!("  {}", file.relative_path.display());
	}
	for copy in copies {
		println!(
			"Would copy '{}' to '{}'",
			copy.source.display(),
			make_relative(&copy.destination, &args.output_root)
		);
	}
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
