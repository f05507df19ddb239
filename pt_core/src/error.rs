use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum PtError {
	#[error(transparent)]
	#[diagnostic(code(pt::io_error))]
	Io(#[from] std::io::Error),

	#[error("`{command}` directive in {file} does not accept {got} argument(s)")]
	#[diagnostic(
		code(pt::invalid_arguments),
		help("expected {expected}")
	)]
	InvalidArguments {
		command: String,
		expected: &'static str,
		got: usize,
		file: String,
	},

	#[error("duplicate export `{name}` in {file}")]
	#[diagnostic(
		code(pt::duplicate_export),
		help("each export name can only be stored once per file")
	)]
	DuplicateExport { name: String, file: String },

	#[error("`end` directive in {file} without an active export")]
	#[diagnostic(
		code(pt::no_active_capture),
		help("open a capture with `export <name>` before closing it with `end`")
	)]
	NoActiveCapture { file: String },

	#[error("export `{name}` in {file} is still being captured")]
	#[diagnostic(
		code(pt::incomplete_export),
		help("move the import after the `end` directive that closes `{name}`")
	)]
	IncompleteExport { name: String, file: String },

	#[error("unable to resolve reference `{reference}` from {file}: {reason}")]
	#[diagnostic(code(pt::unresolved_reference))]
	UnresolvedReference {
		reference: String,
		file: String,
		reason: String,
	},

	#[error("unable to locate package `{package}` from {}", directory.display())]
	#[diagnostic(
		code(pt::unresolved_package),
		help("install the package so that `{modules_dir}/{package}` exists above the importing file")
	)]
	UnresolvedPackage {
		package: String,
		directory: PathBuf,
		modules_dir: String,
	},

	#[error("export `{name}` not found in {}", target.display())]
	#[diagnostic(code(pt::unresolved_export))]
	UnresolvedExport { name: String, target: PathBuf },

	#[error("circular import of {}", path.display())]
	#[diagnostic(
		code(pt::circular_import),
		help("the file is already being processed in this run")
	)]
	CircularImport { path: PathBuf },

	#[error("invalid replacement for {file}: {reason}")]
	#[diagnostic(code(pt::invalid_replacement))]
	InvalidReplacement { file: String, reason: String },

	#[error("invalid options: {0}")]
	#[diagnostic(
		code(pt::invalid_options),
		help("the start and end delimiters must both be non-empty")
	)]
	InvalidOptions(String),

	#[error("failed to load config file: {0}")]
	#[diagnostic(
		code(pt::config_parse),
		help("check that pt.toml is valid TOML with `start`, `end`, `prefix`, or `modules_dir` keys")
	)]
	ConfigParse(String),
}

pub type PtResult<T> = Result<T, PtError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
