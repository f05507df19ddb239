use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::PtError;
use crate::PtResult;
use crate::splice::Splicer;

/// Delimiter opening a directive region when nothing else is configured.
pub const DEFAULT_START: &str = "<!--";
/// Delimiter closing a directive region when nothing else is configured.
pub const DEFAULT_END: &str = "-->";
/// Text a directive's first line must begin with to be recognized.
pub const DEFAULT_PREFIX: &str = "pt:";
/// Dependency directory searched for `package:path` references.
pub const DEFAULT_MODULES_DIR: &str = "node_modules";

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["pt.toml", ".pt.toml", ".config/pt.toml"];

/// The options that govern a single processing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOptions {
	/// Delimiter opening a directive region.
	pub start: String,
	/// Delimiter closing a directive region.
	pub end: String,
	/// Required leading text of a directive. An empty prefix treats every
	/// token as a directive attempt.
	pub prefix: String,
	/// Name of the dependency directory used to locate packages.
	pub modules_dir: String,
}

impl Default for ProcessOptions {
	fn default() -> Self {
		Self {
			start: DEFAULT_START.to_string(),
			end: DEFAULT_END.to_string(),
			prefix: DEFAULT_PREFIX.to_string(),
			modules_dir: DEFAULT_MODULES_DIR.to_string(),
		}
	}
}

impl ProcessOptions {
	pub fn validate(&self) -> PtResult<()> {
		Splicer::new(&self.start, &self.end)?;

		if self.modules_dir.is_empty() {
			return Err(PtError::InvalidOptions("modules directory is empty".into()));
		}

		Ok(())
	}

	/// Overlay the values present in `config` on top of these options.
	#[must_use]
	pub fn with_config(mut self, config: &PtConfig) -> Self {
		if let Some(start) = &config.start {
			self.start.clone_from(start);
		}
		if let Some(end) = &config.end {
			self.end.clone_from(end);
		}
		if let Some(prefix) = &config.prefix {
			self.prefix.clone_from(prefix);
		}
		if let Some(modules_dir) = &config.modules_dir {
			self.modules_dir.clone_from(modules_dir);
		}

		self
	}
}

/// Configuration loaded from a `pt.toml` file. Every key is optional and
/// falls back to the built-in default.
///
/// ```toml
/// start = "<!--"
/// end = "-->"
/// prefix = "pt:"
/// modules_dir = "node_modules"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PtConfig {
	pub start: Option<String>,
	pub end: Option<String>,
	pub prefix: Option<String>,
	pub modules_dir: Option<String>,
}

impl PtConfig {
	/// Find the highest precedence config file in `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config file discovered in `root`, if there is one.
	pub fn load(root: &Path) -> PtResult<Option<PtConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::load_file(&config_path).map(Some)
	}

	/// Load a config file from an explicit path.
	pub fn load_file(path: &Path) -> PtResult<PtConfig> {
		let content = std::fs::read_to_string(path)
			.map_err(|e| PtError::ConfigParse(format!("{}: {e}", path.display())))?;
		toml::from_str(&content).map_err(|e| PtError::ConfigParse(e.to_string()))
	}
}
