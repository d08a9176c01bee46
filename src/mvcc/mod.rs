//! Module implement the versioned key index and its restore pipeline.
//!
//! Each mutation ingested by the engine is tagged with a [Revision], a
//! `(main, sub)` pair ordered first by `main`, the logical clock of the
//! committed batch, and then by `sub`, the operation's offset within the
//! batch. Per-key history is kept as generations, refer to [KeyIndex],
//! and the full key-set is indexed by [TreeIndex].
//!
//! The revision log persisted by the backend keys every record with the
//! fixed-width encoding implemented in [revision], so that a byte-ordered
//! range scan over the log is also a revision-ordered scan. [restore_index]
//! exploits this to rebuild the tree index after a restart, streaming the
//! log in bounded chunks.

mod key_index;
mod restore;
pub mod revision;
mod tree_index;
mod types;

pub use key_index::{Generation, KeyIndex};
pub use restore::{restore_index, RestoreStats, RESTORE_CHUNK_SIZE};
pub use revision::Revision;
pub use tree_index::TreeIndex;
pub use types::{KeyValue, RevRecord};
