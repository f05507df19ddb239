use crate::ExportTable;
use crate::FileIdentity;
use crate::PtError;
use crate::PtResult;

/// Where a [`FileSession`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
	/// The stream is still being read. Its raw buffer may be partial.
	#[default]
	Open,
	/// The stream ended and every directive in it was handled.
	Finished,
	/// Processing stopped with an error.
	Failed,
}

/// The single capture slot of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Capture {
	#[default]
	Inactive,
	/// Body bytes are being accumulated for the export `name`.
	Active { name: String, buffer: Vec<u8> },
}

/// The processing state of one file.
///
/// The raw buffer only ever grows. It holds the body bytes seen so far, so a
/// file that is still open (because it is part of an import cycle) exposes
/// a prefix of its content.
#[derive(Debug, Clone)]
pub struct FileSession {
	identity: FileIdentity,
	raw: Vec<u8>,
	capture: Capture,
	exports: ExportTable,
	status: SessionStatus,
}

impl FileSession {
	pub fn new(identity: FileIdentity) -> Self {
		Self {
			identity,
			raw: Vec::new(),
			capture: Capture::Inactive,
			exports: ExportTable::new(),
			status: SessionStatus::Open,
		}
	}

	pub fn identity(&self) -> &FileIdentity {
		&self.identity
	}

	pub fn raw(&self) -> &[u8] {
		&self.raw
	}

	pub fn exports(&self) -> &ExportTable {
		&self.exports
	}

	pub fn status(&self) -> SessionStatus {
		self.status
	}

	/// Name of the export currently being captured.
	pub fn capturing(&self) -> Option<&str> {
		match &self.capture {
			Capture::Inactive => None,
			Capture::Active { name, .. } => Some(name),
		}
	}

	/// Record body bytes that were forwarded downstream.
	pub fn append_body(&mut self, bytes: &[u8]) {
		self.raw.extend_from_slice(bytes);

		if let Capture::Active { buffer, .. } = &mut self.capture {
			buffer.extend_from_slice(bytes);
		}
	}

	/// Store an export value under `name`.
	pub fn store(&mut self, name: String, value: Vec<u8>) -> PtResult<()> {
		if self.exports.insert(name.as_str(), value) {
			return Ok(());
		}

		Err(PtError::DuplicateExport {
			name,
			file: self.identity.to_string(),
		})
	}

	/// Start capturing under `name`, storing any capture already in
	/// progress first.
	pub fn begin_capture(&mut self, name: String) -> PtResult<()> {
		self.close_capture()?;
		self.capture = Capture::Active {
			name,
			buffer: Vec::new(),
		};

		Ok(())
	}

	/// Store the active capture, trimmed of surrounding whitespace.
	pub fn end_capture(&mut self) -> PtResult<()> {
		if self.close_capture()? {
			Ok(())
		} else {
			Err(PtError::NoActiveCapture {
				file: self.identity.to_string(),
			})
		}
	}

	/// Store the active capture if there is one. Returns whether a capture
	/// was stored.
	pub fn close_capture(&mut self) -> PtResult<bool> {
		let Capture::Active { name, buffer } = std::mem::take(&mut self.capture) else {
			return Ok(false);
		};

		self.store(name, buffer.trim_ascii().to_vec())?;
		Ok(true)
	}

	pub(crate) fn set_status(&mut self, status: SessionStatus) {
		self.status = status;
	}
}
