use std::ffi::OsStr;
use std::ffi::OsString;
use std::fmt::Display;
use std::path::Path;
use std::path::PathBuf;

/// The `(directory, filename)` pair naming a source for caching and cycle
/// detection.
///
/// A `None` filename denotes an anonymous stream such as piped input. Its
/// directory only serves as the base for relative references; anonymous
/// identities are never cached or looked up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileIdentity {
	directory: PathBuf,
	filename: Option<OsString>,
}

impl FileIdentity {
	/// Identity of the file at `path`. The path should already be absolute.
	pub fn from_path(path: &Path) -> Self {
		let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
		let filename = path.file_name().map(OsStr::to_os_string);

		Self {
			directory,
			filename,
		}
	}

	/// Identity of an unnamed stream whose relative references resolve
	/// against `directory`.
	pub fn anonymous(directory: impl Into<PathBuf>) -> Self {
		Self {
			directory: directory.into(),
			filename: None,
		}
	}

	pub fn directory(&self) -> &Path {
		&self.directory
	}

	pub fn filename(&self) -> Option<&OsStr> {
		self.filename.as_deref()
	}

	pub fn is_anonymous(&self) -> bool {
		self.filename.is_none()
	}

	/// The full path of a named source.
	pub fn path(&self) -> Option<PathBuf> {
		self.filename.as_ref().map(|name| self.directory.join(name))
	}
}

impl Display for FileIdentity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.path() {
			Some(path) => write!(f, "{}", path.display()),
			None => f.write_str("<stdin>"),
		}
	}
}
