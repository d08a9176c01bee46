//! Module implement an ordered, in-memory rendition of the backend
//! interface.

use std::{collections::BTreeMap, ops::Bound};

use crate::{
    backend::{Meta, ScanEntry, Snapshot},
    mvcc::{KeyValue, Revision},
    Result,
};

/// Memory backend, a revision log and a metadata bucket over ordered maps.
///
/// Stands in for the durable transactional backend in tests and doubles up
/// as the reference implementation of the [Snapshot] and [Meta] contracts.
/// Log records are keyed by the fixed-width revision encoding, value
/// payloads are CBOR, so scan order is revision order.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    keys: BTreeMap<Vec<u8>, Vec<u8>>, // revision-keyed log records
    meta: BTreeMap<Vec<u8>, Vec<u8>>, // metadata bucket
}

impl Memory {
    pub fn new() -> Memory {
        Memory::default()
    }

    /// Append a log record for `kv` at `rev`, the write-path shape this
    /// package's restore expects from the real backend.
    pub fn put_record(&mut self, rev: Revision, tombstone: bool, kv: &KeyValue) -> Result<()> {
        let key = rev.to_bytes(tombstone);
        let value = kv.to_bytes()?;
        self.keys.insert(key, value);
        Ok(())
    }

    /// Insert raw bytes into the revision log, corrupt records included.
    pub fn put_raw(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.keys.insert(key, value);
    }

    /// Return number of records in the revision log.
    pub fn len_records(&self) -> usize {
        self.keys.len()
    }

    /// Open a read-only scoped snapshot over the revision log. The
    /// snapshot's view is pinned at open, later writes to this backend
    /// are not visible through it.
    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            keys: self.keys.clone(),
        }
    }
}

impl Meta for Memory {
    fn get_meta(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.meta.get(key).cloned()
    }

    fn set_meta(&mut self, key: &[u8], value: &[u8]) {
        self.meta.insert(key.to_vec(), value.to_vec());
    }
}

/// Read-only scoped snapshot over [Memory]'s revision log.
#[derive(Clone, Debug)]
pub struct MemorySnapshot {
    keys: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl Snapshot for MemorySnapshot {
    fn scan(&self, low: &[u8], high: &[u8], limit: usize) -> Result<Vec<ScanEntry>> {
        let range = (Bound::Included(low), Bound::Included(high));
        let entries = self
            .keys
            .range::<[u8], _>(range)
            .take(limit)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(entries)
    }

    fn close(self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;
