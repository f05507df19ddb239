use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use derive_more::Deref;

/// Named byte values exported by a single file.
///
/// Reads go through [`Deref`] to the underlying map. Writes only go through
/// [`ExportTable::insert`], which never overwrites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref)]
pub struct ExportTable(BTreeMap<String, Vec<u8>>);

impl ExportTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Store `value` under `name`. Returns `false` and leaves the table
	/// untouched when `name` is already present.
	pub fn insert(&mut self, name: impl Into<String>, value: Vec<u8>) -> bool {
		match self.0.entry(name.into()) {
			Entry::Occupied(_) => false,
			Entry::Vacant(entry) => {
				entry.insert(value);
				true
			}
		}
	}

	pub fn value(&self, name: &str) -> Option<&[u8]> {
		self.0.get(name).map(Vec::as_slice)
	}
}
