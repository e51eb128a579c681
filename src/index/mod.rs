//! Key index folded from a materialized table.
//!
//! Duplicate keys are last-write-wins: a later row replaces both the position
//! and the value of an earlier one. Iteration keeps the order in which each
//! key was first seen.

use std::fmt;
use std::mem::size_of;

use indexmap::IndexMap;

use crate::table::Table;

/// Position and value recorded for a key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexEntry {
    /// 0-based row index in the table.
    pub position: usize,
    /// Value of that row.
    pub value: f64,
}

/// Mapping from key to its last [`IndexEntry`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyIndex {
    entries: IndexMap<String, IndexEntry>,
}

impl KeyIndex {
    /// Fold `table` in row order.
    pub fn build(table: &Table) -> Self {
        let mut index = Self {
            entries: IndexMap::with_capacity(table.len()),
        };
        for (position, row) in table.iter().enumerate() {
            index.insert(row.key, IndexEntry { position, value: row.value });
        }
        index.entries.shrink_to_fit();
        index
    }

    /// Insert or overwrite `key`. An overwritten key keeps its place in
    /// iteration order.
    pub fn insert(&mut self, key: &str, entry: IndexEntry) {
        match self.entries.get_mut(key) {
            Some(slot) => *slot = entry,
            None => {
                self.entries.insert(key.to_owned(), entry);
            }
        }
    }

    /// Entry for `key`.
    pub fn get(&self, key: &str) -> Option<&IndexEntry> {
        self.entries.get(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no key was indexed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexEntry)> + '_ {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Approximate allocated footprint in bytes.
    ///
    /// Counts the entry buckets (hash, key, entry), one index slot per bucket
    /// and the key strings. Allocator overhead and hash control bytes are not
    /// included.
    pub fn allocated_bytes(&self) -> usize {
        let key_bytes: usize = self.entries.keys().map(String::capacity).sum();
        self.entries.capacity()
            * (size_of::<(u64, String, IndexEntry)>() + size_of::<usize>())
            + key_bytes
    }
}

impl fmt::Display for KeyIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, entry)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}: ({}, {:?})", key, entry.position, entry.value)?;
        }
        f.write_str("}")
    }
}
