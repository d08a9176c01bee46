//! Module implement the restore pipeline, rebuilding the tree index from
//! the backend's revision log.
//!
//! Two threads per restore invocation, no more. The calling thread scans
//! the log in bounded chunks and decodes each record, a spawned builder
//! thread folds the decoded stream into a fresh [TreeIndex]. The bounded
//! channel between them is the sole shared resource and the sole
//! synchronization mechanism, its capacity caps resident memory to
//! O(chunk-size) records regardless of log size. The scanner blocks on a
//! full channel, the builder blocks on an empty one.
//!
//! Lifecycle is strictly sequenced, the scanner finishes producing and
//! drops its tx-channel, the builder drains the remainder and returns the
//! finished index, join surfaces it to the caller. Restore is an
//! all-or-nothing startup step, there is no timeout or cancellation built
//! into the pipeline and partial results are discarded on failure.

use log::{debug, info, warn};

use std::{collections::HashMap, mem};

use crate::{
    backend::Snapshot,
    mvcc::{revision, KeyIndex, KeyValue, RevRecord, Revision, TreeIndex},
    util::thread,
    Error, Result,
};

/// Default number of log records per scanned chunk. Also sizes the
/// scanner-to-builder channel and the builder's key cache.
pub const RESTORE_CHUNK_SIZE: usize = 10_000;

// Number of cache entries purged at a time once the cache is full.
const CACHE_EVICT_BATCH: usize = 10;

/// Statistics for a single restore run.
///
/// Non-fatal anomalies never abort a restore, they are counted here and
/// logged, so that operators can detect a corrupted log even though the
/// restore itself completes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RestoreStats {
    /// Number of records forwarded to the builder.
    pub n_records: usize,
    /// Number of records that extended an existing history.
    pub n_puts: usize,
    /// Number of tombstones that closed an open generation.
    pub n_tombstones: usize,
    /// Number of distinct keys installed into the tree index.
    pub n_keys: usize,
    /// Records dropped, encoded revision key of unexpected length.
    pub n_malformed_keys: usize,
    /// Records dropped, value payload failed to parse.
    pub n_bad_values: usize,
    /// Tombstones for keys with no history at all, dropped.
    pub n_orphan_tombstones: usize,
    /// Tombstones for keys whose generation was already closed, dropped.
    pub n_stale_tombstones: usize,
}

/// Rebuild the tree index by scanning `snap`'s revision log in chunks of
/// `chunk_size` records. Blocking call, returns the fully rebuilt index
/// along with this run's [RestoreStats].
///
/// The snapshot is released on completion, success or failure. Per-record
/// anomalies are contained, counted and logged, only structural failures,
/// an unusable snapshot or a violated builder invariant, abort the call.
pub fn restore_index<S>(snap: S, chunk_size: usize) -> Result<(TreeIndex, RestoreStats)>
where
    S: Snapshot,
{
    let res = do_restore(&snap, chunk_size);
    let closed = snap.close();

    let (index, stats) = res?;
    closed?;

    info!(
        target: "restore",
        "restored {} keys from {} records", stats.n_keys, stats.n_records
    );
    let n_dropped = stats.n_malformed_keys
        + stats.n_bad_values
        + stats.n_orphan_tombstones
        + stats.n_stale_tombstones;
    if n_dropped > 0 {
        warn!(target: "restore", "dropped {} records, {:?}", n_dropped, stats);
    }

    Ok((index, stats))
}

fn do_restore<S>(snap: &S, chunk_size: usize) -> Result<(TreeIndex, RestoreStats)>
where
    S: Snapshot,
{
    if chunk_size == 0 {
        return err_at!(InvalidInput, msg: "restore chunk_size cannot be ZERO");
    }

    let builder = {
        let builder = Builder::new(chunk_size);
        let main_loop = move |rx| move || builder.run(rx);
        thread::Thread::new_sync("restore-builder", chunk_size, main_loop)
    };
    let tx = builder.to_tx();

    let scanned = scan_log(snap, chunk_size, &tx);
    mem::drop(tx);

    // builder's own error, if any, wins over the scanner's IPCFail.
    let (index, mut stats) = builder.join()??;
    let (n_malformed_keys, n_bad_values) = scanned?;
    stats.n_malformed_keys = n_malformed_keys;
    stats.n_bad_values = n_bad_values;

    Ok((index, stats))
}

// Scan the revision log from the lowest assignable revision through the
// maximal one, in chunks of `chunk_size`, and stream decoded records to
// the builder. Return the count of (malformed-key, bad-value) drops.
fn scan_log<S>(
    snap: &S,
    chunk_size: usize,
    tx: &thread::Tx<RevRecord>,
) -> Result<(usize, usize)>
where
    S: Snapshot,
{
    let mut low = Revision::new(1, 0).to_bytes(false);
    let high = Revision::max().to_bytes(true);

    let (mut n_malformed_keys, mut n_bad_values) = (0, 0);

    loop {
        let entries = snap.scan(&low, &high, chunk_size)?;
        if entries.is_empty() {
            break;
        }

        let n = entries.len();
        debug!(target: "restore", "scanned chunk of {} records", n);

        let last_key = match entries.last() {
            Some((key, _)) => key.clone(),
            None => unreachable!(),
        };

        for (key, value) in entries.into_iter() {
            let rev = match Revision::from_bytes(&key) {
                Ok(rev) => rev,
                Err(err) => {
                    n_malformed_keys += 1;
                    warn!(target: "restore", "dropping record, {}", err);
                    continue;
                }
            };
            let kv = match KeyValue::from_slice(&value) {
                Ok(kv) => kv,
                Err(err) => {
                    n_bad_values += 1;
                    warn!(target: "restore", "dropping record at {:?}, {}", rev, err);
                    continue;
                }
            };
            let tombstone = revision::is_tombstone(&key);
            tx.post(RevRecord { rev, tombstone, kv })?;
        }

        if n < chunk_size {
            // partial chunk implies final chunk
            break;
        }

        // next chunk begins right after where this one ended
        let mut next = match Revision::from_bytes(&last_key) {
            Ok(rev) => rev,
            Err(err) => return err_at!(Fatal, msg: "cannot resume scan, {}", err),
        };
        next.sub += 1;
        low = next.to_bytes(false);
    }

    Ok((n_malformed_keys, n_bad_values))
}

// Builder folds the decoded record stream into a fresh TreeIndex. Single
// consumer, owns the tree and the cache for the life of the restore.
struct Builder {
    index: TreeIndex,
    cache: HashMap<Vec<u8>, usize>, // key -> slot within the tree index
    chunk_size: usize,
    stats: RestoreStats,
}

impl Builder {
    fn new(chunk_size: usize) -> Builder {
        Builder {
            index: TreeIndex::new(),
            cache: HashMap::with_capacity(chunk_size),
            chunk_size,
            stats: RestoreStats::default(),
        }
    }

    fn run(mut self, rx: thread::Rx<RevRecord>) -> Result<(TreeIndex, RestoreStats)> {
        for rkv in rx {
            self.handle(rkv)?;
        }
        Ok((self.index, self.stats))
    }

    fn handle(&mut self, rkv: RevRecord) -> Result<()> {
        self.stats.n_records += 1;

        let RevRecord { rev, tombstone, kv } = rkv;

        let mut slot = self.cache.get(kv.key.as_slice()).copied();

        // purge a bounded batch when plenty of keys missed the cache.
        // eviction is arbitrary, a miss falls back to the tree probe.
        if slot.is_none() && self.cache.len() >= self.chunk_size {
            let keys: Vec<Vec<u8>> = {
                let iter = self.cache.keys().take(CACHE_EVICT_BATCH).cloned();
                iter.collect()
            };
            for key in keys.into_iter() {
                self.cache.remove(&key);
            }
        }
        // cache miss, fetch from the tree index if the key is there.
        if slot.is_none() {
            slot = self.index.lookup(&kv.key);
            if let Some(n) = slot {
                self.cache.insert(kv.key.clone(), n);
            }
        }

        match slot {
            Some(n) if tombstone => match self.index.entry_mut(n).tombstone(rev.main, rev.sub) {
                Ok(()) => self.stats.n_tombstones += 1,
                Err(err) => {
                    self.stats.n_stale_tombstones += 1;
                    warn!(target: "restore", "{}", err);
                }
            },
            Some(n) => {
                self.index.entry_mut(n).put(rev.main, rev.sub);
                self.stats.n_puts += 1;
            }
            None if tombstone => {
                // a delete with no visible prior creation, nothing to rebuild.
                self.stats.n_orphan_tombstones += 1;
                warn!(
                    target: "restore",
                    "orphan tombstone for {:?} at ({},{})",
                    String::from_utf8_lossy(&kv.key), rev.main, rev.sub
                );
            }
            None => {
                let mut ki = KeyIndex::new(kv.key.clone());
                ki.restore(Revision::new(kv.create_revision, 0), rev, kv.version);
                let n = self.index.insert(ki)?;
                self.cache.insert(kv.key, n);
                self.stats.n_keys += 1;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "restore_test.rs"]
mod restore_test;
