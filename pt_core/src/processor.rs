use std::io;
use std::path::Path;

use tokio::io::AsyncReadExt;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;

use crate::Directive;
use crate::FileIdentity;
use crate::FileSession;
use crate::FsLoader;
use crate::Loader;
use crate::ProcessOptions;
use crate::PtError;
use crate::PtResult;
use crate::Registry;
use crate::SessionId;
use crate::SessionStatus;
use crate::Source;
use crate::resolver;
use crate::resolver::canonical_path;
use crate::splice::Segment;
use crate::splice::Splicer;

/// Number of bytes requested from a source per read.
const CHUNK_SIZE: usize = 8 * 1024;

/// What a token is replaced with in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
	/// The live output of a session that has not been driven yet.
	Stream(SessionId),
	/// Concrete bytes written in place of the token.
	Bytes(Vec<u8>),
	/// The token is dropped.
	Empty,
	/// The token is written back with its delimiters.
	PassThrough,
}

/// Runs directive processing for one invocation.
///
/// The processor owns the session registry, so every file is read at most
/// once per processor. Output is written to the sink as the input is read;
/// a file imported as a whole is processed in place, so a slow sink pauses
/// reads of every file in the chain.
///
/// The futures returned here are not `Send`. Drive them on a current thread
/// runtime.
#[derive(Debug)]
pub struct Processor<L = FsLoader> {
	options: ProcessOptions,
	loader: L,
	registry: Registry,
}

impl Processor<FsLoader> {
	/// Create a processor reading files from the local filesystem.
	pub fn new(options: ProcessOptions) -> PtResult<Self> {
		Self::with_loader(options, FsLoader)
	}
}

impl<L: Loader> Processor<L> {
	pub fn with_loader(options: ProcessOptions, loader: L) -> PtResult<Self> {
		options.validate()?;

		Ok(Self {
			options,
			loader,
			registry: Registry::new(),
		})
	}

	pub fn options(&self) -> &ProcessOptions {
		&self.options
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// Process `source` and write the result to `sink`.
	///
	/// Output written before an error is not retracted.
	pub async fn run<W>(&self, source: Source, identity: FileIdentity, sink: &mut W) -> PtResult<()>
	where
		W: AsyncWrite + Unpin,
	{
		let id = self.registry.register(identity, source)?;
		self.drive(id, sink).await?;
		sink.flush().await?;

		Ok(())
	}

	/// Open the file at `path` with the loader and process it into `sink`.
	pub async fn run_path<W>(&self, path: &Path, sink: &mut W) -> PtResult<()>
	where
		W: AsyncWrite + Unpin,
	{
		let path = canonical_path(path).await;
		let source = self
			.loader
			.open(&path)
			.await
			.map_err(|e| io::Error::new(e.kind(), format!("{}: {e}", path.display())))?;

		self.run(source, FileIdentity::from_path(&path), sink).await
	}

	/// Stream a registered session into `sink` and record how it ended.
	pub(crate) async fn drive(&self, id: SessionId, sink: &mut (dyn AsyncWrite + Unpin)) -> PtResult<()> {
		let Some(source) = self.registry.take_source(id) else {
			return Err(PtError::InvalidReplacement {
				file: self.registry.with(id, |session| session.identity().to_string()),
				reason: "its stream has already been consumed".into(),
			});
		};

		let result = self.stream(id, source, sink).await;
		let status = if result.is_ok() {
			SessionStatus::Finished
		} else {
			SessionStatus::Failed
		};
		self.registry
			.with_mut(id, |session| session.set_status(status));

		result
	}

	async fn stream(
		&self,
		id: SessionId,
		mut source: Source,
		sink: &mut (dyn AsyncWrite + Unpin),
	) -> PtResult<()> {
		let identity = self.registry.with(id, |session| session.identity().clone());
		tracing::debug!(file = %identity, "processing");

		let mut splicer = Splicer::new(&self.options.start, &self.options.end)?;
		let mut chunk = vec![0; CHUNK_SIZE];

		loop {
			let read = source.read(&mut chunk).await?;
			let segments = if read == 0 {
				splicer.finish()
			} else {
				splicer.push(&chunk[..read])
			};

			for segment in segments {
				match segment {
					Segment::Body(bytes) => {
						tracing::trace!(file = %identity, len = bytes.len(), "body");
						self.registry
							.with_mut(id, |session| session.append_body(&bytes));
						sink.write_all(&bytes).await?;
					}
					Segment::Token(token) => {
						let replacement = self.interpret(id, &identity, &token).await?;
						self.splice(replacement, &token, sink).await?;
					}
				}
			}

			if read == 0 {
				break;
			}
		}

		if let Some(name) = self
			.registry
			.with(id, |session| session.capturing().map(str::to_string))
		{
			tracing::warn!(file = %identity, %name, "export still open at end of file");
			self.registry.with_mut(id, FileSession::close_capture)?;
		}

		tracing::debug!(file = %identity, "finished");
		Ok(())
	}

	/// Compute the replacement for one token of the session `id`.
	async fn interpret(
		&self,
		id: SessionId,
		identity: &FileIdentity,
		token: &[u8],
	) -> PtResult<Replacement> {
		let Some(directive) = Directive::parse(token, &self.options.prefix, identity)? else {
			return Ok(Replacement::PassThrough);
		};

		tracing::debug!(file = %identity, ?directive, "directive");

		match directive {
			Directive::ImportFile { reference } => self.import_file(id, identity, &reference).await,
			Directive::ImportExport { reference, name } => {
				self.import_export(identity, &reference, &name).await
			}
			Directive::Capture { name } => {
				self.registry
					.with_mut(id, |session| session.begin_capture(name))?;
				Ok(Replacement::Empty)
			}
			Directive::Export { name, value } => {
				self.registry
					.with_mut(id, |session| session.store(name, value))?;
				Ok(Replacement::Empty)
			}
			Directive::End => {
				self.registry.with_mut(id, FileSession::end_capture)?;
				Ok(Replacement::Empty)
			}
			Directive::Unrecognized { command } => {
				tracing::debug!(file = %identity, %command, "dropping unknown directive");
				Ok(Replacement::Empty)
			}
		}
	}

	/// `import <ref>`: a local export, or the whole processed file.
	async fn import_file(
		&self,
		id: SessionId,
		identity: &FileIdentity,
		reference: &str,
	) -> PtResult<Replacement> {
		let local = self.registry.with(id, |session| {
			if let Some(value) = session.exports().value(reference) {
				return Ok(Some(value.to_vec()));
			}

			if session.capturing() == Some(reference) {
				return Err(PtError::IncompleteExport {
					name: reference.to_string(),
					file: identity.to_string(),
				});
			}

			Ok(None)
		})?;

		if let Some(value) = local {
			return Ok(Replacement::Bytes(value));
		}

		let path =
			resolver::resolve(reference, identity.directory(), &self.options.modules_dir).await?;
		let target = FileIdentity::from_path(&path);

		if let Some(cached) = self.registry.lookup(&target) {
			let (raw, status) = self
				.registry
				.with(cached, |session| (session.raw().to_vec(), session.status()));

			if status == SessionStatus::Open {
				tracing::debug!(file = %target, len = raw.len(), "importing partial content of open file");
			} else {
				tracing::debug!(file = %target, "importing cached content");
			}

			return Ok(Replacement::Bytes(raw));
		}

		let child = self.open_session(reference, identity, &path).await?;
		Ok(Replacement::Stream(child))
	}

	/// `import <ref> <name>`: a named export of another file.
	async fn import_export(
		&self,
		identity: &FileIdentity,
		reference: &str,
		name: &str,
	) -> PtResult<Replacement> {
		let path =
			resolver::resolve(reference, identity.directory(), &self.options.modules_dir).await?;
		let target = FileIdentity::from_path(&path);

		let session = if let Some(existing) = self.registry.lookup(&target) {
			existing
		} else {
			let child = self.open_session(reference, identity, &path).await?;
			tracing::debug!(file = %target, "loading exports");
			Box::pin(self.drive(child, &mut tokio::io::sink())).await?;
			child
		};

		self.registry.with(session, |session| {
			if let Some(value) = session.exports().value(name) {
				return Ok(Replacement::Bytes(value.to_vec()));
			}

			if session.capturing() == Some(name) {
				return Err(PtError::IncompleteExport {
					name: name.to_string(),
					file: target.to_string(),
				});
			}

			Err(PtError::UnresolvedExport {
				name: name.to_string(),
				target: path.clone(),
			})
		})
	}

	/// Open `path` and register a new session for it.
	async fn open_session(
		&self,
		reference: &str,
		identity: &FileIdentity,
		path: &Path,
	) -> PtResult<SessionId> {
		let source = self.loader.open(path).await.map_err(|e| {
			PtError::UnresolvedReference {
				reference: reference.to_string(),
				file: identity.to_string(),
				reason: format!("{}: {e}", path.display()),
			}
		})?;

		self.registry.register(FileIdentity::from_path(path), source)
	}

	/// Write `replacement` in place of `token`.
	async fn splice(
		&self,
		replacement: Replacement,
		token: &[u8],
		sink: &mut (dyn AsyncWrite + Unpin),
	) -> PtResult<()> {
		match replacement {
			Replacement::Stream(child) => Box::pin(self.drive(child, sink)).await?,
			Replacement::Bytes(bytes) => sink.write_all(&bytes).await?,
			Replacement::Empty => {}
			Replacement::PassThrough => {
				sink.write_all(self.options.start.as_bytes()).await?;
				sink.write_all(token).await?;
				sink.write_all(self.options.end.as_bytes()).await?;
			}
		}

		Ok(())
	}
}
