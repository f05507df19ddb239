use std::cell::RefCell;
use std::collections::HashMap;

use crate::FileIdentity;
use crate::FileSession;
use crate::PtError;
use crate::PtResult;
use crate::Source;

/// Index of a session inside its [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(usize);

#[derive(Default)]
struct RegistryInner {
	sessions: Vec<FileSession>,
	index: HashMap<FileIdentity, SessionId>,
	/// Sources of sessions that have not been driven yet.
	sources: HashMap<SessionId, Source>,
}

/// Every session created during a run, keyed by file identity.
///
/// Entries are never removed, so a file is read at most once per run and a
/// file that is still open can be recognised when it is referenced again.
/// The registry is not `Sync`: runs are single threaded and every borrow is
/// released before the next suspension point.
#[derive(Default)]
pub struct Registry {
	inner: RefCell<RegistryInner>,
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a session for `identity` that will read from `source`.
	///
	/// Fails with [`PtError::CircularImport`] when a session already exists
	/// for the identity. Anonymous identities are never indexed and always
	/// get a fresh session.
	pub fn register(&self, identity: FileIdentity, source: Source) -> PtResult<SessionId> {
		let mut inner = self.inner.borrow_mut();

		if inner.index.contains_key(&identity) {
			return Err(PtError::CircularImport {
				path: identity.path().unwrap_or_default(),
			});
		}

		let id = SessionId(inner.sessions.len());

		if !identity.is_anonymous() {
			inner.index.insert(identity.clone(), id);
		}

		tracing::debug!(file = %identity, "registered session");
		inner.sessions.push(FileSession::new(identity));
		inner.sources.insert(id, source);

		Ok(id)
	}

	pub fn lookup(&self, identity: &FileIdentity) -> Option<SessionId> {
		self.inner.borrow().index.get(identity).copied()
	}

	/// Take the source of a session so it can be driven. Returns `None` once
	/// the source has been taken.
	pub fn take_source(&self, id: SessionId) -> Option<Source> {
		self.inner.borrow_mut().sources.remove(&id)
	}

	/// Read a session.
	pub fn with<R>(&self, id: SessionId, f: impl FnOnce(&FileSession) -> R) -> R {
		f(&self.inner.borrow().sessions[id.0])
	}

	/// Mutate a session. The closure must not call back into the registry.
	pub fn with_mut<R>(&self, id: SessionId, f: impl FnOnce(&mut FileSession) -> R) -> R {
		f(&mut self.inner.borrow_mut().sessions[id.0])
	}

	pub fn len(&self) -> usize {
		self.inner.borrow().sessions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl std::fmt::Debug for Registry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let inner = self.inner.borrow();
		f.debug_struct("Registry")
			.field("sessions", &inner.sessions)
			.field("pending", &inner.sources.len())
			.finish()
	}
}
