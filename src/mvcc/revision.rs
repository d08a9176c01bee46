//! Module implement the fixed-width, order-preserving encoding for
//! revisions.
//!
//! Byte-lexicographic order of encoded revisions agrees with the numeric
//! order of `(main, sub)`, so the backend's native ordered range scan
//! doubles up as a revision-ordered scan. The encoding must stay stable,
//! it determines scan ordering and must match whatever encoding the write
//! path used.

use std::convert::TryInto;

use crate::{Error, Result};

/// Number of bytes in an encoded revision, sans the tombstone marker.
pub const REV_BYTES_LEN: usize = 8 + 1 + 8;

/// Number of bytes in an encoded revision carrying the tombstone marker.
pub const REV_TOMBSTONE_BYTES_LEN: usize = REV_BYTES_LEN + 1;

const REV_SEPARATOR: u8 = b'_';
const MARK_TOMBSTONE: u8 = b't';

/// Revision identify a point in the engine's logical history.
///
/// `main` is the global logical-clock value of a committed batch, `sub`
/// disambiguates multiple operations within the same batch. Revisions are
/// immutable once assigned, the engine assigns them starting from ONE.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd)]
pub struct Revision {
    pub main: i64,
    pub sub: i64,
}

impl<'a> arbitrary::Arbitrary<'a> for Revision {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let main = u.int_in_range(0..=i64::MAX)?;
        let sub = u.int_in_range(0..=i64::MAX)?;
        Ok(Revision { main, sub })
    }
}

impl Revision {
    pub fn new(main: i64, sub: i64) -> Revision {
        Revision { main, sub }
    }

    /// Return the maximum representable revision. Scanning up to
    /// `max().to_bytes(true)` covers the entire revision log, tombstone
    /// records included.
    pub fn max() -> Revision {
        Revision {
            main: i64::MAX,
            sub: i64::MAX,
        }
    }

    /// Encode this revision into its fixed-width ordered key, 8-byte
    /// big-endian `main`, a separator byte, 8-byte big-endian `sub`, and
    /// a trailing marker byte when `tombstone` is true.
    pub fn to_bytes(&self, tombstone: bool) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(REV_TOMBSTONE_BYTES_LEN);
        bytes.extend_from_slice(&self.main.to_be_bytes());
        bytes.push(REV_SEPARATOR);
        bytes.extend_from_slice(&self.sub.to_be_bytes());
        if tombstone {
            bytes.push(MARK_TOMBSTONE);
        }
        bytes
    }

    /// Decode the revision portion of an encoded key, tombstone marker, if
    /// present, is ignored. Keys of any other length fail with MalformedKey.
    pub fn from_bytes(bytes: &[u8]) -> Result<Revision> {
        match bytes.len() {
            REV_BYTES_LEN | REV_TOMBSTONE_BYTES_LEN => {
                let main = {
                    let buf: [u8; 8] = err_at!(FailConvert, bytes[..8].try_into())?;
                    i64::from_be_bytes(buf)
                };
                let sub = {
                    let buf: [u8; 8] = err_at!(FailConvert, bytes[9..17].try_into())?;
                    i64::from_be_bytes(buf)
                };
                Ok(Revision { main, sub })
            }
            n => err_at!(MalformedKey, msg: "encoded revision of {} bytes", n),
        }
    }
}

/// Return whether an encoded revision key carries the tombstone marker.
pub fn is_tombstone(bytes: &[u8]) -> bool {
    bytes.len() == REV_TOMBSTONE_BYTES_LEN && bytes[REV_BYTES_LEN] == MARK_TOMBSTONE
}

#[cfg(test)]
#[path = "revision_test.rs"]
mod revision_test;
