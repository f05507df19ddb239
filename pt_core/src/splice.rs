//! Incremental delimiter scanning.
//!
//! The [`Splicer`] is fed the input stream chunk by chunk and splits it into
//! [`Segment`]s: body bytes which are passed through as-is, and tokens which
//! are the bytes enclosed by a start and end delimiter. Delimiters may be
//! split across chunk boundaries.

use crate::PtError;
use crate::PtResult;

/// A piece of the input stream as seen by the [`Splicer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	/// Bytes outside of any delimiter pair.
	Body(Vec<u8>),
	/// Bytes enclosed by a delimiter pair, delimiters excluded.
	Token(Vec<u8>),
}

/// Splits a byte stream into body and token segments.
///
/// The first end delimiter after a start delimiter closes the token, so
/// tokens never nest. Re-wrapping every token in its delimiters and
/// concatenating all segments reproduces the input exactly.
#[derive(Debug, Clone)]
pub struct Splicer {
	start: Vec<u8>,
	end: Vec<u8>,
	/// Bytes received but not yet emitted.
	pending: Vec<u8>,
	/// Whether a start delimiter has been consumed without its end.
	in_token: bool,
}

impl Splicer {
	/// Create a splicer for the given delimiters. Fails with
	/// [`PtError::InvalidOptions`] when either delimiter is empty.
	pub fn new(start: &str, end: &str) -> PtResult<Self> {
		if start.is_empty() {
			return Err(PtError::InvalidOptions("start delimiter is empty".into()));
		}

		if end.is_empty() {
			return Err(PtError::InvalidOptions("end delimiter is empty".into()));
		}

		Ok(Self {
			start: start.as_bytes().to_vec(),
			end: end.as_bytes().to_vec(),
			pending: Vec::new(),
			in_token: false,
		})
	}

	/// Whether the scanner is currently inside a token.
	pub fn in_token(&self) -> bool {
		self.in_token
	}

	/// Feed the next chunk of input and collect every segment that can be
	/// emitted without seeing more data.
	pub fn push(&mut self, chunk: &[u8]) -> Vec<Segment> {
		self.pending.extend_from_slice(chunk);
		let mut segments = Vec::new();

		loop {
			if self.in_token {
				let Some(index) = memstr(&self.pending, &self.end) else {
					break;
				};

				let token: Vec<u8> = self.pending.drain(..index).collect();
				self.pending.drain(..self.end.len());
				self.in_token = false;
				segments.push(Segment::Token(token));
			} else if let Some(index) = memstr(&self.pending, &self.start) {
				if index > 0 {
					segments.push(Segment::Body(self.pending.drain(..index).collect()));
				}

				self.pending.drain(..self.start.len());
				self.in_token = true;
			} else {
				// Hold back a tail that could still become a start delimiter.
				let held = partial_suffix_len(&self.pending, &self.start);
				let ready = self.pending.len() - held;

				if ready > 0 {
					segments.push(Segment::Body(self.pending.drain(..ready).collect()));
				}

				break;
			}
		}

		segments
	}

	/// Signal the end of input. Anything still buffered is emitted as body;
	/// an unterminated token is emitted with its start delimiter restored.
	pub fn finish(&mut self) -> Vec<Segment> {
		let mut body = Vec::new();

		if std::mem::take(&mut self.in_token) {
			body.extend_from_slice(&self.start);
		}

		body.append(&mut self.pending);

		if body.is_empty() {
			vec![]
		} else {
			vec![Segment::Body(body)]
		}
	}
}

fn memstr(haystack: &[u8], needle: &[u8]) -> Option<usize> {
	haystack
		.windows(needle.len())
		.position(|window| window == needle)
}

/// Length of the longest proper prefix of `needle` that `haystack` ends with.
fn partial_suffix_len(haystack: &[u8], needle: &[u8]) -> usize {
	(1..needle.len().min(haystack.len() + 1))
		.rev()
		.find(|&len| haystack.ends_with(&needle[..len]))
		.unwrap_or(0)
}
