use std::future::Future;
use std::io;
use std::path::Path;
use std::pin::Pin;

use tokio::io::AsyncRead;

/// A readable byte stream feeding a session.
pub type Source = Pin<Box<dyn AsyncRead>>;

/// Opens byte sources for resolved file paths.
pub trait Loader {
	fn open(&self, path: &Path) -> impl Future<Output = io::Result<Source>>;
}

/// Loads sources from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl Loader for FsLoader {
	async fn open(&self, path: &Path) -> io::Result<Source> {
		let file = tokio::fs::File::open(path).await?;
		Ok(Box::pin(file))
	}
}
