//! Package implement a versioned key index for MVCC storage.
//!
//! Every user key carries its full history of create/update/delete
//! operations, ordered by [Revision]. A revision is a `(main, sub)` pair,
//! where `main` is the global logical clock of a committed batch and `sub`
//! disambiguates operations within the same batch. Contiguous lifespans of
//! a key, from creation to an optional terminating tombstone, are grouped
//! into generations and held per-key in a [KeyIndex]. The full key-set is
//! indexed by [TreeIndex].
//!
//! Durability is delegated to a pluggable transactional backend, refer to
//! [backend] module. The backend persists the revision log as records keyed
//! by the fixed-width, order-preserving revision encoding, which lets the
//! backend's native ordered range-scan double up as a revision-ordered scan.
//!
//! After a restart the index is rebuilt from the revision log by
//! [restore_index], a two-stage producer/consumer pipeline that scans the
//! log in bounded chunks and streams records to a builder thread over a
//! size-bounded channel. Resident memory is O(chunk-size) regardless of
//! the log size. Refer to [restore_index] for the gory details.

use std::{error, fmt, result};

// Short form to compose Error values.
//
// Long form,
// ```ignore
// return Err(Error::Fatal(String::default(), "bad argument".to_string()));
// ```
//
// Short form,
// ```ignore
// err_at!(Fatal, msg: "bad argument")
// ```
macro_rules! err_at {
    ($v:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err(Error::$v(prefix, format!($($arg),+)))
    }};
    ($v:ident, $e:expr) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                Err(Error::$v(prefix, format!("{}", err)))
            }
        }
    }};
    ($v:ident, $e:expr, $($arg:expr),+) => {{
        match $e {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                let msg = format!($($arg),+);
                Err(Error::$v(prefix, format!("{} {}", err, msg)))
            }
        }
    }};
}

pub mod backend;
pub mod mvcc;
pub mod schema;
pub mod util;

pub use crate::mvcc::{
    restore_index, Generation, KeyIndex, KeyValue, RestoreStats, Revision, TreeIndex,
};

/// Error variants that can be returned by this package's API.
///
/// Each variant carries a prefix, typically identifying the location where
/// the error happened, and a message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    Fatal(String, String),
    FailConvert(String, String),
    FailCbor(String, String),
    InvalidInput(String, String),
    IPCFail(String, String),
    ThreadFail(String, String),
    /// Encoded revision key of unexpected length.
    MalformedKey(String, String),
    /// Log record's value payload could not be parsed.
    ValueDecode(String, String),
    /// Tombstone observed for a key with no open generation.
    NoOpenGeneration(String, String),
    /// Key already indexed, each key must be unique within the tree index.
    DuplicateKey(String, String),
    KeyNotFound(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        use Error::*;

        match self {
            Fatal(p, msg) => write!(f, "{} Fatal: {}", p, msg),
            FailConvert(p, msg) => write!(f, "{} FailConvert: {}", p, msg),
            FailCbor(p, msg) => write!(f, "{} FailCbor: {}", p, msg),
            InvalidInput(p, msg) => write!(f, "{} InvalidInput: {}", p, msg),
            IPCFail(p, msg) => write!(f, "{} IPCFail: {}", p, msg),
            ThreadFail(p, msg) => write!(f, "{} ThreadFail: {}", p, msg),
            MalformedKey(p, msg) => write!(f, "{} MalformedKey: {}", p, msg),
            ValueDecode(p, msg) => write!(f, "{} ValueDecode: {}", p, msg),
            NoOpenGeneration(p, msg) => write!(f, "{} NoOpenGeneration: {}", p, msg),
            DuplicateKey(p, msg) => write!(f, "{} DuplicateKey: {}", p, msg),
            KeyNotFound(p, msg) => write!(f, "{} KeyNotFound: {}", p, msg),
        }
    }
}

impl error::Error for Error {}

/// Type alias for Result return type, used by this package.
pub type Result<T> = result::Result<T, Error>;
