use std::io;
use std::path::Path;
use std::pin::Pin;
use std::task::Context;
use std::task::Poll;

use tempfile::TempDir;
use tokio::io::AsyncRead;
use tokio::io::ReadBuf;

use crate::Loader;
use crate::ProcessOptions;
use crate::Processor;
use crate::PtResult;
use crate::Source;

/// Create a temporary directory containing `files`.
pub(crate) fn fixture(files: &[(&str, &str)]) -> TempDir {
	let tmp = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));

	for (path, content) in files {
		let path = tmp.path().join(path);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create dir: {e}"));
		}
		std::fs::write(&path, content).unwrap_or_else(|e| panic!("write: {e}"));
	}

	tmp
}

pub(crate) fn options(start: &str, end: &str, prefix: &str) -> ProcessOptions {
	ProcessOptions {
		start: start.to_string(),
		end: end.to_string(),
		prefix: prefix.to_string(),
		..ProcessOptions::default()
	}
}

/// Process `file` inside `root` with the default options.
pub(crate) async fn render(root: &Path, file: &str) -> PtResult<String> {
	render_with(root, file, ProcessOptions::default()).await
}

pub(crate) async fn render_with(root: &Path, file: &str, options: ProcessOptions) -> PtResult<String> {
	let processor = Processor::new(options)?;
	render_processor(&processor, root, file).await
}

pub(crate) async fn render_processor<L: Loader>(
	processor: &Processor<L>,
	root: &Path,
	file: &str,
) -> PtResult<String> {
	let mut output = Vec::new();
	processor.run_path(&root.join(file), &mut output).await?;

	Ok(String::from_utf8_lossy(&output).into_owned())
}

/// An in-memory source that hands out at most `step` bytes per read.
pub(crate) struct Trickle {
	data: Vec<u8>,
	position: usize,
	step: usize,
}

impl Trickle {
	pub(crate) fn new(data: impl Into<Vec<u8>>, step: usize) -> Self {
		Self {
			data: data.into(),
			position: 0,
			step,
		}
	}
}

impl AsyncRead for Trickle {
	fn poll_read(
		mut self: Pin<&mut Self>,
		_cx: &mut Context<'_>,
		buf: &mut ReadBuf<'_>,
	) -> Poll<io::Result<()>> {
		let start = self.position;
		let len = self
			.step
			.min(buf.remaining())
			.min(self.data.len() - start);

		buf.put_slice(&self.data[start..start + len]);
		self.position += len;

		Poll::Ready(Ok(()))
	}
}

/// Loads files from disk but serves them through a [`Trickle`].
pub(crate) struct TrickleLoader {
	pub step: usize,
}

impl Loader for TrickleLoader {
	async fn open(&self, path: &Path) -> io::Result<Source> {
		let data = tokio::fs::read(path).await?;
		Ok(Box::pin(Trickle::new(data, self.step)))
	}
}
