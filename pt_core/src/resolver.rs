//! Reference resolution.
//!
//! A reference is either a plain path, resolved relative to the directory of
//! the file containing the directive, or a `package:path` pair where `path`
//! is resolved relative to the directory of an installed package. Packages
//! are found the way node resolves dependencies: by walking up from the
//! referencing directory and checking `<dir>/node_modules/<package>` at each
//! level. A package starting with `.` or `/` names a directory directly.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::PtError;
use crate::PtResult;

/// The parsed form of an import reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
	/// `path`
	Plain(&'a str),
	/// `package:path`
	Qualified { package: &'a str, path: &'a str },
}

impl<'a> Reference<'a> {
	pub fn parse(reference: &'a str) -> Self {
		match reference.split_once(':') {
			Some((package, path)) if !path.is_empty() => Self::Qualified { package, path },
			Some((path, _)) => Self::Plain(path),
			None => Self::Plain(reference),
		}
	}
}

/// Resolve `reference` as written in a file located in `directory`.
pub async fn resolve(reference: &str, directory: &Path, modules_dir: &str) -> PtResult<PathBuf> {
	let resolved = match Reference::parse(reference) {
		Reference::Plain(path) => directory.join(path),
		Reference::Qualified { package, path } => {
			let Some(root) = locate_package(package, directory, modules_dir).await else {
				return Err(PtError::UnresolvedPackage {
					package: package.to_string(),
					directory: directory.to_path_buf(),
					modules_dir: modules_dir.to_string(),
				});
			};

			root.join(path)
		}
	};

	let resolved = canonical_path(&resolved).await;
	tracing::debug!(reference, path = %resolved.display(), "resolved reference");

	Ok(resolved)
}

/// Find the root directory of `package`, searching upward from `directory`.
pub async fn locate_package(package: &str, directory: &Path, modules_dir: &str) -> Option<PathBuf> {
	if package.is_empty() {
		return None;
	}

	if package.starts_with('.') || package.starts_with('/') {
		let root = directory.join(package);
		return is_dir(&root).await.then_some(root);
	}

	for ancestor in directory.ancestors() {
		let candidate = ancestor.join(modules_dir).join(package);
		if is_dir(&candidate).await {
			return Some(candidate);
		}
	}

	None
}

/// Absolute form of `path` used as its identity: `.` and `..` are folded
/// lexically and symlinks are resolved when the file exists.
pub async fn canonical_path(path: &Path) -> PathBuf {
	let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
	let normalized = normalize_path(&absolute);

	tokio::fs::canonicalize(&normalized)
		.await
		.unwrap_or(normalized)
}

async fn is_dir(path: &Path) -> bool {
	tokio::fs::metadata(path)
		.await
		.is_ok_and(|metadata| metadata.is_dir())
}

/// Fold `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
	let mut normalized = PathBuf::new();

	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				match normalized.components().next_back() {
					Some(Component::Normal(_)) => {
						normalized.pop();
					}
					// `..` above the root stays at the root.
					Some(Component::RootDir | Component::Prefix(_)) => {}
					Some(Component::CurDir | Component::ParentDir) | None => {
						normalized.push(component);
					}
				}
			}
			Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
				normalized.push(component);
			}
		}
	}

	normalized
}
