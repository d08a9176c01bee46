use cbordata::Cborize;

use crate::{mvcc::Revision, util, Error, Result};

/// This value must change only when the shape of KeyValue type changes.
/// High 16-bits identify the type and lower 16-bits identify the version.
const KEY_VALUE_VER: u32 = 0x00060001;

/// KeyValue describe the parsed value-payload of a single log record.
///
/// `create_revision` is the main revision at which the key's current
/// generation was created, `mod_revision` the revision of this record and
/// `version` the per-key counter, ONE for the creating record and
/// incremented for every subsequent modification within the generation.
#[derive(Clone, Debug, Default, Eq, PartialEq, Cborize)]
pub struct KeyValue {
    pub key: Vec<u8>,
    pub create_revision: i64,
    pub mod_revision: i64,
    pub version: i64,
    pub lease: i64,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub const ID: u32 = KEY_VALUE_VER;

    /// Serialize into the on-log byte form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        util::into_cbor_bytes(self.clone())
    }

    /// Parse a log record's value-payload.
    pub fn from_slice(data: &[u8]) -> Result<KeyValue> {
        match util::from_cbor_bytes::<KeyValue>(data) {
            Ok((kv, _)) => Ok(kv),
            Err(err) => err_at!(ValueDecode, msg: "{}", err),
        }
    }
}

/// Unit of work streamed from the log scanner to the index builder, one
/// fully decoded log record.
#[derive(Clone, Debug)]
pub struct RevRecord {
    pub rev: Revision,
    pub tombstone: bool,
    pub kv: KeyValue,
}
