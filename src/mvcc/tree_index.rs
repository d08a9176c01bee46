//! Module implement the key-ordered index over [KeyIndex] histories.

use std::collections::BTreeMap;

use crate::{
    mvcc::{KeyIndex, Revision},
    Error, Result,
};

/// TreeIndex own the [KeyIndex] history for every key in the live set.
///
/// Entries are held in a slot-arena, the ordered map carries key to slot.
/// Slots double up as non-owning handles into the tree, the restore
/// pipeline's cache holds slots instead of back-references into the tree.
/// Exclusive writer during restore, read-shared afterwards.
#[derive(Clone, Debug, Default)]
pub struct TreeIndex {
    entries: Vec<KeyIndex>,
    keys: BTreeMap<Vec<u8>, usize>, // key -> slot within entries
}

impl PartialEq for TreeIndex {
    fn eq(&self, other: &TreeIndex) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl Eq for TreeIndex {}

impl TreeIndex {
    pub fn new() -> TreeIndex {
        TreeIndex::default()
    }

    /// Return number of keys in this index.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Return whether index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Lookup the slot indexing `key`'s history.
    pub fn lookup(&self, key: &[u8]) -> Option<usize> {
        self.keys.get(key).copied()
    }

    /// Install a new [KeyIndex], return its slot. Fail with DuplicateKey
    /// if a history exists for the key, callers are expected to lookup
    /// before insert.
    pub fn insert(&mut self, ki: KeyIndex) -> Result<usize> {
        let key = ki.as_key().to_vec();
        if self.keys.contains_key(&key) {
            return err_at!(DuplicateKey, msg: "{:?}", String::from_utf8_lossy(&key));
        }

        let slot = self.entries.len();
        self.entries.push(ki);
        self.keys.insert(key, slot);
        Ok(slot)
    }

    /// Return the history held at `slot`.
    pub fn entry(&self, slot: usize) -> &KeyIndex {
        &self.entries[slot]
    }

    /// Return mutable access to the history held at `slot`.
    pub fn entry_mut(&mut self, slot: usize) -> &mut KeyIndex {
        &mut self.entries[slot]
    }

    /// Point-in-time lookup for `key` as of `at_rev`, return
    /// `(created, modified, ver)`.
    pub fn get(&self, key: &[u8], at_rev: i64) -> Result<(Revision, Revision, i64)> {
        match self.lookup(key) {
            Some(slot) => self.entries[slot].get(at_rev),
            None => err_at!(KeyNotFound, msg: "{:?}", String::from_utf8_lossy(key)),
        }
    }

    /// Iterate over key histories in key order.
    pub fn iter(&self) -> impl Iterator<Item = &KeyIndex> {
        self.keys.values().map(move |slot| &self.entries[*slot])
    }
}

#[cfg(test)]
#[path = "tree_index_test.rs"]
mod tree_index_test;
